mod phase;

pub use phase::PhaseCommands;
