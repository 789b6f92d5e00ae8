//! Test objectives, their scenarios and company links.

use chrono::{DateTime, Utc};
use cov_core::entities::{Scenario, TestObjective};
use cov_core::ids::{PREFIX_OBJECTIVE, PREFIX_SCENARIO, RecordId};

use crate::error::DatabaseError;
use crate::helpers::opt_id_value;
use crate::service::CovService;

/// Input for `create_objective`.
#[derive(Debug, Clone, Default)]
pub struct NewObjective {
    pub code: String,
    pub name: String,
    pub phase_id: Option<RecordId>,
    pub module_id: Option<RecordId>,
    pub tor_id: Option<RecordId>,
}

/// Input for `add_scenario`. The text fields are stored as entered.
#[derive(Debug, Clone, Default)]
pub struct NewScenario {
    pub result: Option<String>,
    pub severity: Option<String>,
    pub fix_type: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

async fn insert_objective_row(
    conn: &libsql::Connection,
    id: &RecordId,
    input: &NewObjective,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO test_objectives (id, code, name, phase_id, module_id, tor_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            id.as_str(),
            input.code.as_str(),
            input.name.as_str(),
            opt_id_value(input.phase_id.as_ref()),
            opt_id_value(input.module_id.as_ref()),
            opt_id_value(input.tor_id.as_ref())
        ],
    )
    .await?;
    Ok(())
}

pub(crate) async fn insert_scenario(
    conn: &libsql::Connection,
    scenario: &Scenario,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO scenarios (id, objective_id, result, severity, fix_type, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            scenario.id.as_str(),
            scenario.objective_id.as_str(),
            scenario.result.as_deref(),
            scenario.severity.as_deref(),
            scenario.fix_type.as_deref(),
            scenario.updated_at.map(|at| at.to_rfc3339())
        ],
    )
    .await?;
    Ok(())
}

pub(crate) async fn insert_company_link(
    conn: &libsql::Connection,
    objective_id: &RecordId,
    company_id: &RecordId,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO objective_companies (objective_id, company_id) VALUES (?1, ?2)",
        libsql::params![objective_id.as_str(), company_id.as_str()],
    )
    .await?;
    Ok(())
}

/// Insert an objective with its nested scenarios and company links.
///
/// Returns the number of scenarios written.
pub(crate) async fn insert_objective(
    conn: &libsql::Connection,
    objective: &TestObjective,
) -> Result<u64, DatabaseError> {
    let row = NewObjective {
        code: objective.code.clone(),
        name: objective.name.clone(),
        phase_id: objective.phase_id.clone(),
        module_id: objective.module_id.clone(),
        tor_id: objective.tor.as_ref().map(|tor| tor.id.clone()),
    };
    insert_objective_row(conn, &objective.id, &row).await?;

    let mut scenarios = 0;
    for scenario in &objective.scenarios {
        if scenario.objective_id != objective.id {
            return Err(DatabaseError::InvalidState(format!(
                "scenario {} is nested under objective {} but points at {}",
                scenario.id, objective.id, scenario.objective_id
            )));
        }
        insert_scenario(conn, scenario).await?;
        scenarios += 1;
    }
    for link in &objective.companies {
        insert_company_link(conn, &objective.id, &link.company_id).await?;
    }
    Ok(scenarios)
}

impl CovService {
    pub async fn create_objective(&self, input: NewObjective) -> Result<RecordId, DatabaseError> {
        let id = RecordId::new(self.db().generate_id(PREFIX_OBJECTIVE).await?);
        insert_objective_row(self.db().conn(), &id, &input).await?;
        Ok(id)
    }

    pub async fn add_scenario(
        &self,
        objective_id: &RecordId,
        input: NewScenario,
    ) -> Result<Scenario, DatabaseError> {
        let scenario = Scenario {
            id: RecordId::new(self.db().generate_id(PREFIX_SCENARIO).await?),
            objective_id: objective_id.clone(),
            result: input.result,
            severity: input.severity,
            fix_type: input.fix_type,
            updated_at: input.updated_at,
        };
        insert_scenario(self.db().conn(), &scenario).await?;
        Ok(scenario)
    }

    /// Link an objective to a company. Linking twice is a no-op.
    pub async fn link_company(
        &self,
        objective_id: &RecordId,
        company_id: &RecordId,
    ) -> Result<(), DatabaseError> {
        insert_company_link(self.db().conn(), objective_id, company_id).await
    }
}
