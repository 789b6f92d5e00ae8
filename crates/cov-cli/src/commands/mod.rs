pub mod census;
pub mod dispatch;
pub mod failures;
pub mod import;
pub mod phase;
pub mod stats;
