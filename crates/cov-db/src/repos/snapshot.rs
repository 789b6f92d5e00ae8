//! Bulk import of a JSON snapshot of the relational state.
//!
//! The whole snapshot is written in one transaction: a rejected row rolls
//! back everything written before it.

use std::path::Path;

use chrono::Utc;
use cov_core::context::SessionContext;
use cov_core::entities::{Company, Module, StakeholderGroup, TestObjective, Tor, TorTestCaseLink};
use cov_core::ids::RecordId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;
use crate::repos::catalog::{insert_company, insert_module, insert_tor};
use crate::repos::objective::insert_objective;
use crate::repos::stakeholder::{insert_group, insert_group_tor, insert_tor_test_case};
use crate::service::CovService;

/// A phase as it appears in a snapshot; timestamps are assigned on import.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SnapshotPhase {
    pub id: RecordId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GroupTorRef {
    pub group_id: RecordId,
    pub tor_id: RecordId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct Snapshot {
    pub companies: Vec<Company>,
    pub modules: Vec<Module>,
    pub phases: Vec<SnapshotPhase>,
    pub tors: Vec<Tor>,
    pub objectives: Vec<TestObjective>,
    pub groups: Vec<StakeholderGroup>,
    pub group_tors: Vec<GroupTorRef>,
    pub tor_test_cases: Vec<TorTestCaseLink>,
}

impl Snapshot {
    /// Parse a snapshot from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the JSON does not describe a
    /// snapshot.
    pub fn from_json(json: &str) -> Result<Self, DatabaseError> {
        let invalid = |e: serde_json::Error| DatabaseError::InvalidState(format!("invalid snapshot: {e}"));
        let value: serde_json::Value = serde_json::from_str(json).map_err(invalid)?;
        if !value.is_object() {
            return Err(DatabaseError::InvalidState(
                "invalid snapshot: top level must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(invalid)
    }

    /// Read and parse a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the file cannot be read or
    /// parsed.
    pub fn from_path(path: &Path) -> Result<Self, DatabaseError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            DatabaseError::InvalidState(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Number of top-level records, used to size progress reporting.
    #[must_use]
    pub fn record_count(&self) -> u64 {
        [
            self.companies.len(),
            self.modules.len(),
            self.phases.len(),
            self.tors.len(),
            self.objectives.len(),
            self.groups.len(),
            self.group_tors.len(),
            self.tor_test_cases.len(),
        ]
        .iter()
        .map(|n| *n as u64)
        .sum()
    }
}

/// Rows written by an import.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub companies: u64,
    pub modules: u64,
    pub phases: u64,
    pub tors: u64,
    pub objectives: u64,
    pub scenarios: u64,
    pub groups: u64,
    pub group_tors: u64,
    pub tor_test_cases: u64,
}

impl CovService {
    /// Import a snapshot. Requires the admin capability.
    ///
    /// `progress` is called after each section with the section name and the
    /// number of records it held.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Rejected` for a non-admin session and the
    /// underlying error if any row is rejected, in which case nothing is
    /// written.
    pub async fn import_snapshot<F>(
        &self,
        ctx: &SessionContext,
        snapshot: &Snapshot,
        mut progress: F,
    ) -> Result<ImportSummary, DatabaseError>
    where
        F: FnMut(&'static str, u64),
    {
        ctx.require_admin("import")?;
        let tx = self.db().conn().transaction().await?;
        let mut summary = ImportSummary::default();

        for company in &snapshot.companies {
            insert_company(&tx, company).await?;
            summary.companies += 1;
        }
        progress("companies", summary.companies);

        for module in &snapshot.modules {
            insert_module(&tx, module).await?;
            summary.modules += 1;
        }
        progress("modules", summary.modules);

        let now = Utc::now().to_rfc3339();
        for phase in &snapshot.phases {
            tx.execute(
                "INSERT INTO phases (id, code, name, description, sort_order, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                libsql::params![
                    phase.id.as_str(),
                    phase.code.trim(),
                    phase.name.trim(),
                    phase.description.as_deref(),
                    phase.sort_order,
                    now.as_str()
                ],
            )
            .await?;
            summary.phases += 1;
        }
        progress("phases", summary.phases);

        for tor in &snapshot.tors {
            insert_tor(&tx, tor).await?;
            summary.tors += 1;
        }
        progress("tors", summary.tors);

        for objective in &snapshot.objectives {
            summary.scenarios += insert_objective(&tx, objective).await?;
            summary.objectives += 1;
        }
        progress("objectives", summary.objectives);

        for group in &snapshot.groups {
            insert_group(&tx, group).await?;
            summary.groups += 1;
        }
        progress("groups", summary.groups);

        for link in &snapshot.group_tors {
            insert_group_tor(&tx, &link.group_id, &link.tor_id).await?;
            summary.group_tors += 1;
        }
        progress("group_tors", summary.group_tors);

        for link in &snapshot.tor_test_cases {
            insert_tor_test_case(&tx, link).await?;
            summary.tor_test_cases += 1;
        }
        progress("tor_test_cases", summary.tor_test_cases);

        tx.commit().await?;
        tracing::info!(
            user = %ctx.user,
            objectives = summary.objectives,
            scenarios = summary.scenarios,
            "snapshot imported"
        );
        Ok(summary)
    }
}
