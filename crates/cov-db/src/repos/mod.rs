//! Repository methods, implemented as `impl CovService` blocks.

pub mod catalog;
pub mod objective;
pub mod phase;
pub mod snapshot;
pub mod stakeholder;
