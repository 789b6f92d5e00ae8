//! Entity structs for all Covboard domain objects.
//!
//! Each entity maps to a table in the libSQL database (see `cov-db`
//! migrations). All structs derive `Serialize`, `Deserialize`, and
//! `JsonSchema` for JSON roundtrip, snapshot import, and schema validation.
//! From the aggregator's point of view every entity is a read-only input.

mod catalog;
mod objective;
mod phase;
mod scenario;
mod stakeholder;

pub use catalog::{Company, Module, Tor};
pub use objective::{CompanyLink, TestObjective, TorRef};
pub use phase::Phase;
pub use scenario::Scenario;
pub use stakeholder::{GroupTorLink, StakeholderGroup, TorTestCaseLink};
