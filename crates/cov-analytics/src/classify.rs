//! Keyword classification of free-text severity and fix-type fields.
//!
//! Each table is ordered; the first category whose keyword occurs anywhere in
//! the lowercased text wins. Empty, missing and unmatched text falls back to
//! the last bucket.

use cov_core::enums::{FixType, Severity};

type Rules<T> = &'static [(T, &'static [&'static str])];

const SEVERITY_RULES: Rules<Severity> = &[
    (Severity::Critical, &["critical"]),
    (Severity::Major, &["high", "major"]),
    (Severity::Minor, &["medium", "minor"]),
];

const FIX_TYPE_RULES: Rules<FixType> = &[
    (FixType::Redevelopment, &["development", "bug", "program"]),
    (FixType::ChangeRequest, &["request", "cr"]),
    (FixType::UiUx, &["ui", "ux", "cosmetic"]),
    (FixType::Workflow, &["workflow", "flow"]),
];

fn first_match<T: Copy>(rules: Rules<T>, text: Option<&str>, fallback: T) -> T {
    let Some(text) = text.map(str::to_lowercase).filter(|t| !t.trim().is_empty()) else {
        return fallback;
    };
    rules
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map_or(fallback, |(category, _)| *category)
}

#[must_use]
pub fn classify_severity(text: Option<&str>) -> Severity {
    first_match(SEVERITY_RULES, text, Severity::Trivial)
}

#[must_use]
pub fn classify_fix_type(text: Option<&str>) -> FixType {
    first_match(FIX_TYPE_RULES, text, FixType::Unclassified)
}
