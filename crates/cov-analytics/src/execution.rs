//! Execution-state counts, failure breakdowns and progress percentages.
//!
//! Each nested scenario of the filtered objectives is one execution row.
//! Percentages are taken against `assigned`, never against the executed
//! subset.

use cov_core::entities::{Scenario, TestObjective};
use cov_core::enums::{FixType, ScenarioResult, Severity};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classify::{classify_fix_type, classify_severity};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeverityBreakdown {
    pub critical: u64,
    pub major: u64,
    pub minor: u64,
    pub trivial: u64,
}

impl SeverityBreakdown {
    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::Major => self.major += 1,
            Severity::Minor => self.minor += 1,
            Severity::Trivial => self.trivial += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.critical + self.major + self.minor + self.trivial
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FixTypeBreakdown {
    pub redevelopment: u64,
    pub change_request: u64,
    pub ui_ux: u64,
    pub workflow: u64,
    pub unclassified: u64,
}

impl FixTypeBreakdown {
    fn record(&mut self, fix_type: FixType) {
        match fix_type {
            FixType::Redevelopment => self.redevelopment += 1,
            FixType::ChangeRequest => self.change_request += 1,
            FixType::UiUx => self.ui_ux += 1,
            FixType::Workflow => self.workflow += 1,
            FixType::Unclassified => self.unclassified += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.redevelopment + self.change_request + self.ui_ux + self.workflow + self.unclassified
    }
}

/// Shares of `assigned`, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Percentages {
    pub pass: f64,
    pub fail: f64,
    pub not_run: f64,
    pub total: f64,
}

impl Percentages {
    #[allow(clippy::cast_precision_loss)]
    fn of(assigned: u64, passed: u64, failed: u64, not_run: u64) -> Self {
        if assigned == 0 {
            return Self::default();
        }
        let share = |part: u64| part as f64 / assigned as f64 * 100.0;
        let (pass, fail, not_run) = (share(passed), share(failed), share(not_run));
        Self {
            pass,
            fail,
            not_run,
            total: pass + fail + not_run,
        }
    }

    /// `total` rounded to a whole percent within `0..=100`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn overall_progress(&self) -> u8 {
        self.total.round().clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExecutionSummary {
    pub assigned: u64,
    pub true_executed: u64,
    pub passed: u64,
    /// Fail and Blocked together.
    pub failed: u64,
    /// The Blocked share of `failed`.
    pub blocked: u64,
    /// Not Run and N/A.
    pub not_run: u64,
    /// `assigned - true_executed - not_run`; negative values are reported,
    /// not clamped.
    pub remaining: i64,
    /// Rows whose result text is not a known spelling. Counted as undecided.
    pub unrecognized_results: u64,
    pub severity: SeverityBreakdown,
    pub fix_type: FixTypeBreakdown,
    pub percentages: Percentages,
}

fn signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Aggregate the execution rows of `rows`.
#[must_use]
pub fn summarize(rows: &[TestObjective]) -> ExecutionSummary {
    let scenarios: Vec<&Scenario> = rows.iter().flat_map(|o| &o.scenarios).collect();
    let mut summary = ExecutionSummary {
        assigned: scenarios.len() as u64,
        ..ExecutionSummary::default()
    };

    for scenario in &scenarios {
        if scenario.has_unrecognized_result() {
            summary.unrecognized_results += 1;
        }
        let Some(result) = scenario.outcome() else {
            continue;
        };
        if result.is_executed() {
            summary.true_executed += 1;
        }
        if result.is_not_run() {
            summary.not_run += 1;
        }
        match result {
            ScenarioResult::Pass => summary.passed += 1,
            ScenarioResult::Fail | ScenarioResult::Blocked => {
                summary.failed += 1;
                if result == ScenarioResult::Blocked {
                    summary.blocked += 1;
                }
                summary
                    .severity
                    .record(classify_severity(scenario.severity.as_deref()));
                summary
                    .fix_type
                    .record(classify_fix_type(scenario.fix_type.as_deref()));
            }
            _ => {}
        }
    }

    summary.remaining =
        signed(summary.assigned) - signed(summary.true_executed) - signed(summary.not_run);
    if summary.remaining < 0 {
        tracing::warn!(
            assigned = summary.assigned,
            executed = summary.true_executed,
            not_run = summary.not_run,
            remaining = summary.remaining,
            "negative remaining count"
        );
    }
    if summary.unrecognized_results > 0 {
        tracing::warn!(
            rows = summary.unrecognized_results,
            "unrecognized scenario results counted as undecided"
        );
    }

    summary.percentages = Percentages::of(
        summary.assigned,
        summary.passed,
        summary.failed,
        summary.not_run,
    );
    summary
}
