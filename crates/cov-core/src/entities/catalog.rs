use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::RecordId;

/// A company taking part in test execution.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Company {
    pub id: RecordId,
    pub name: String,
}

/// Top-level functional grouping used for reporting and stakeholder scoping.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Module {
    pub id: RecordId,
    pub code: String,
    pub name: String,
}

/// Terms-of-Reference record. Every TOR belongs to exactly one module.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Tor {
    pub id: RecordId,
    pub code: String,
    #[serde(default)]
    pub title: String,
    pub module_id: RecordId,
}
