//! Record identifiers and ID prefix constants.
//!
//! Identifiers reach Covboard from several places: generated by `cov-db`
//! (`"obj-a3f8b2c1"`), typed on the command line, or read from JSON snapshots
//! where upstream systems emit them as integers. `RecordId` normalizes all of
//! these to one canonical text form so that equality never depends on how an
//! identifier was transported.

use std::fmt;

use schemars::JsonSchema;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

pub const PREFIX_PHASE: &str = "phs";
pub const PREFIX_OBJECTIVE: &str = "obj";
pub const PREFIX_SCENARIO: &str = "scn";
pub const PREFIX_COMPANY: &str = "cmp";
pub const PREFIX_MODULE: &str = "mod";
pub const PREFIX_TOR: &str = "tor";
pub const PREFIX_GROUP: &str = "grp";
pub const PREFIX_TEST_CASE: &str = "tcs";

/// Every prefix `cov-db` generates IDs for.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_PHASE,
    PREFIX_OBJECTIVE,
    PREFIX_SCENARIO,
    PREFIX_COMPANY,
    PREFIX_MODULE,
    PREFIX_TOR,
    PREFIX_GROUP,
    PREFIX_TEST_CASE,
];

/// Canonical identifier of any stored record.
///
/// The canonical form is the trimmed text; integers are rendered in decimal.
/// Ordering is lexicographic on the canonical text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Build an identifier from any textual form, trimming surrounding whitespace.
    #[must_use]
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether the canonical form is empty (blank input).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordIdVisitor;

        impl Visitor<'_> for RecordIdVisitor {
            type Value = RecordId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer identifier")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RecordId, E> {
                Ok(RecordId::new(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RecordId, E> {
                Ok(RecordId::from(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RecordId, E> {
                Ok(RecordId::from(v))
            }
        }

        deserializer.deserialize_any(RecordIdVisitor)
    }
}
