use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::RecordId;

/// A named collection of TORs used for targeted reporting.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StakeholderGroup {
    pub id: RecordId,
    pub name: String,
}

/// A group's link to one TOR, denormalized with the TOR's module.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GroupTorLink {
    pub group_id: RecordId,
    pub tor_id: RecordId,
    pub module_id: RecordId,
    pub module_name: String,
}

/// A TOR's link to one test case. A test case may hang off several TORs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct TorTestCaseLink {
    pub tor_id: RecordId,
    pub test_case_id: RecordId,
}
