//! Report shapes handed to presentation validate against their JSON Schema.

use chrono::{TimeZone, Utc};
use cov_analytics::census::build_census;
use cov_analytics::execution::summarize;
use cov_analytics::failures::{FailedIssue, paginate};
use cov_analytics::scope::count_rows;
use cov_core::entities::{GroupTorLink, Scenario, TestObjective, TorRef, TorTestCaseLink};
use cov_core::enums::{FailureKind, FixType, Severity};
use schemars::schema_for;
use serde::Serialize;

fn validate<T: Serialize>(schema: schemars::Schema, value: &T) {
    let schema = serde_json::to_value(schema).unwrap();
    let instance = serde_json::to_value(value).unwrap();
    let validator = jsonschema::validator_for(&schema).expect("schema should be valid");
    let errors: Vec<String> = validator.iter_errors(&instance).map(|e| format!("{e}")).collect();
    assert!(errors.is_empty(), "schema validation failed: {errors:?}");
}

fn rows() -> Vec<TestObjective> {
    vec![TestObjective {
        id: "obj-1".into(),
        code: "TO-1".into(),
        name: "Login".into(),
        phase_id: Some("phs-1".into()),
        module_id: Some("mod-1".into()),
        tor: Some(TorRef {
            id: "tor-1".into(),
            module_id: Some("mod-1".into()),
        }),
        companies: Vec::new(),
        scenarios: vec![
            Scenario {
                id: "scn-1".into(),
                objective_id: "obj-1".into(),
                result: Some("Fail".into()),
                severity: Some("Major".into()),
                fix_type: None,
                updated_at: None,
            },
            Scenario {
                id: "scn-2".into(),
                objective_id: "obj-1".into(),
                result: Some("Pass".into()),
                severity: None,
                fix_type: None,
                updated_at: None,
            },
        ],
    }]
}

#[test]
fn execution_summary_schema() {
    validate(
        schema_for!(cov_analytics::execution::ExecutionSummary),
        &summarize(&rows()),
    );
}

#[test]
fn scope_counts_schema() {
    validate(schema_for!(cov_analytics::scope::ScopeCounts), &count_rows(&rows()));
}

#[test]
fn census_schema() {
    let census = build_census(
        &[GroupTorLink {
            group_id: "grp-1".into(),
            tor_id: "tor-1".into(),
            module_id: "mod-1".into(),
            module_name: "Finance".into(),
        }],
        &[TorTestCaseLink {
            tor_id: "tor-1".into(),
            test_case_id: "obj-1".into(),
        }],
    );
    validate(schema_for!(cov_analytics::census::ModuleCensus), &census);
}

#[test]
fn failure_page_schema() {
    let issue = FailedIssue {
        objective_id: "obj-1".into(),
        objective_code: "TO-1".into(),
        objective_name: "Login".into(),
        scenario_id: "scn-1".into(),
        kind: FailureKind::Blocked,
        severity: Severity::Minor,
        fix_type: FixType::Workflow,
        updated_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        days_active: 3,
    };
    let page = paginate(vec![issue], 1, 20).unwrap();
    validate(schema_for!(cov_analytics::failures::Page<FailedIssue>), &page);
}
