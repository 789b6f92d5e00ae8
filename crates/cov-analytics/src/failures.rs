//! Open failures, newest first, with age and classification badges.

use chrono::{DateTime, Utc};
use cov_core::entities::TestObjective;
use cov_core::enums::{FailureKind, FixType, Severity};
use cov_core::ids::RecordId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classify::{classify_fix_type, classify_severity};
use crate::error::AnalyticsError;

const SECONDS_PER_DAY: u64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FailedIssue {
    pub objective_id: RecordId,
    pub objective_code: String,
    pub objective_name: String,
    pub scenario_id: RecordId,
    pub kind: FailureKind,
    pub severity: Severity,
    pub fix_type: FixType,
    pub updated_at: Option<DateTime<Utc>>,
    /// Whole days since the last update, rounded up. 0 without a timestamp.
    pub days_active: u64,
}

fn days_between(now: DateTime<Utc>, then: DateTime<Utc>) -> u64 {
    (now - then)
        .num_seconds()
        .unsigned_abs()
        .div_ceil(SECONDS_PER_DAY)
}

/// Fail and Blocked rows of `rows`, sorted by `updated_at` descending.
/// Rows without a timestamp sort as if updated at `now`.
#[must_use]
pub fn report_failures(rows: &[TestObjective], now: DateTime<Utc>) -> Vec<FailedIssue> {
    let mut issues: Vec<FailedIssue> = rows
        .iter()
        .flat_map(|objective| {
            objective.scenarios.iter().filter_map(move |scenario| {
                let kind = FailureKind::from_result(scenario.outcome()?)?;
                Some(FailedIssue {
                    objective_id: objective.id.clone(),
                    objective_code: objective.code.clone(),
                    objective_name: objective.name.clone(),
                    scenario_id: scenario.id.clone(),
                    kind,
                    severity: classify_severity(scenario.severity.as_deref()),
                    fix_type: classify_fix_type(scenario.fix_type.as_deref()),
                    updated_at: scenario.updated_at,
                    days_active: scenario.updated_at.map_or(0, |at| days_between(now, at)),
                })
            })
        })
        .collect();
    issues.sort_by(|a, b| b.updated_at.unwrap_or(now).cmp(&a.updated_at.unwrap_or(now)));
    issues
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Slice `items` into 1-based pages. A page past the end is empty.
///
/// # Errors
///
/// Returns `AnalyticsError::InvalidPage` for page 0 or page size 0.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Result<Page<T>, AnalyticsError> {
    if page == 0 || page_size == 0 {
        return Err(AnalyticsError::InvalidPage { page, page_size });
    }
    let total = items.len();
    let start = (page - 1).saturating_mul(page_size);
    let items = items.into_iter().skip(start).take(page_size).collect();
    Ok(Page {
        items,
        page,
        page_size,
        total,
        total_pages: total.div_ceil(page_size),
    })
}
