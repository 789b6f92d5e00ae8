//! Result, classification, population and role enums for Covboard.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Scenario results are stored as free text by upstream tooling, so
//! `ScenarioResult::parse` accepts the spellings seen in practice.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ScenarioResult
// ---------------------------------------------------------------------------

/// Recorded outcome of one scenario execution.
///
/// ```text
/// executed:            pass | fail | blocked
/// terminal, unexecuted: not_run | not_applicable
/// undecided:            pending (and NULL / unrecognized text)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioResult {
    Pass,
    Fail,
    Blocked,
    NotRun,
    NotApplicable,
    Pending,
}

impl ScenarioResult {
    /// Parse a stored result text. Case, surrounding whitespace, and the
    /// separator between words are ignored. Returns `None` for blank or
    /// unrecognized text.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let folded: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-' | '/'))
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "pass" | "passed" => Some(Self::Pass),
            "fail" | "failed" => Some(Self::Fail),
            "blocked" => Some(Self::Blocked),
            "notrun" => Some(Self::NotRun),
            "na" | "notapplicable" => Some(Self::NotApplicable),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }

    /// Pass, Fail and Blocked count as executed.
    #[must_use]
    pub const fn is_executed(self) -> bool {
        matches!(self, Self::Pass | Self::Fail | Self::Blocked)
    }

    /// Not Run and N/A are terminal without having been executed.
    #[must_use]
    pub const fn is_not_run(self) -> bool {
        matches!(self, Self::NotRun | Self::NotApplicable)
    }

    /// Fail and Blocked are open failures.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Fail | Self::Blocked)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Blocked => "blocked",
            Self::NotRun => "not_run",
            Self::NotApplicable => "not_applicable",
            Self::Pending => "pending",
        }
    }

    /// Human-facing label, matching the spelling testers enter.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
            Self::Blocked => "Blocked",
            Self::NotRun => "Not Run",
            Self::NotApplicable => "N/A",
            Self::Pending => "Pending",
        }
    }
}

impl fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity bucket of a failing scenario, highest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Major,
    Minor,
    Trivial,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Trivial => "trivial",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FixType
// ---------------------------------------------------------------------------

/// Kind of fix a failing scenario calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FixType {
    Redevelopment,
    ChangeRequest,
    UiUx,
    Workflow,
    Unclassified,
}

impl FixType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Redevelopment => "redevelopment",
            Self::ChangeRequest => "change_request",
            Self::UiUx => "ui_ux",
            Self::Workflow => "workflow",
            Self::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for FixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FailureKind
// ---------------------------------------------------------------------------

/// Presentation category of an open failure. Fail and Blocked are counted
/// together; this only drives styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Fail,
    Blocked,
}

impl FailureKind {
    #[must_use]
    pub const fn from_result(result: ScenarioResult) -> Option<Self> {
        match result {
            ScenarioResult::Fail => Some(Self::Fail),
            ScenarioResult::Blocked => Some(Self::Blocked),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Population
// ---------------------------------------------------------------------------

/// Populations the provider can count without materializing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Population {
    Tor,
    Module,
    Objective,
    Scenario,
}

impl Population {
    pub const ALL: [Self; 4] = [Self::Tor, Self::Module, Self::Objective, Self::Scenario];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tor => "tor",
            Self::Module => "module",
            Self::Objective => "objective",
            Self::Scenario => "scenario",
        }
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Role of the user driving a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    Viewer,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
