//! Phase repository: the configuration surface.
//!
//! Every mutation requires an admin `SessionContext`. Codes are unique
//! ignoring case, and a phase still referenced by test objectives cannot be
//! deleted.

use chrono::Utc;
use cov_core::context::SessionContext;
use cov_core::entities::Phase;
use cov_core::errors::CoreError;
use cov_core::ids::{PREFIX_PHASE, RecordId};

use crate::error::DatabaseError;
use crate::helpers::{get_id, get_opt_string, parse_datetime};
use crate::service::CovService;
use crate::updates::phase::PhaseUpdate;

const PHASE_COLUMNS: &str = "id, code, name, description, sort_order, created_at, updated_at";

/// Input for `create_phase`.
#[derive(Debug, Clone, Default)]
pub struct NewPhase {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i64,
}

fn row_to_phase(row: &libsql::Row) -> Result<Phase, DatabaseError> {
    Ok(Phase {
        id: get_id(row, 0)?,
        code: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        description: get_opt_string(row, 3)?,
        sort_order: row.get::<i64>(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

fn required(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("phase {field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn phase_not_found(id: &RecordId) -> DatabaseError {
    DatabaseError::Rejected(CoreError::NotFound {
        entity_type: "phase".to_string(),
        id: id.to_string(),
    })
}

impl CovService {
    pub async fn list_phases(&self) -> Result<Vec<Phase>, DatabaseError> {
        let sql = format!("SELECT {PHASE_COLUMNS} FROM phases ORDER BY sort_order, code");
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params::Params::None)
            .await?;
        let mut phases = Vec::new();
        while let Some(row) = rows.next().await? {
            phases.push(row_to_phase(&row)?);
        }
        Ok(phases)
    }

    pub async fn get_phase(&self, id: &RecordId) -> Result<Phase, DatabaseError> {
        let sql = format!("SELECT {PHASE_COLUMNS} FROM phases WHERE id = ?1");
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter([id.as_str()]))
            .await?;
        let row = rows.next().await?.ok_or_else(|| phase_not_found(id))?;
        row_to_phase(&row)
    }

    pub async fn create_phase(
        &self,
        ctx: &SessionContext,
        input: NewPhase,
    ) -> Result<Phase, DatabaseError> {
        ctx.require_admin("phase.create")?;
        let code = required("code", &input.code)?;
        let name = required("name", &input.name)?;
        self.ensure_phase_code_free(&code, None).await?;

        let id = RecordId::new(self.db().generate_id(PREFIX_PHASE).await?);
        let now = Utc::now().to_rfc3339();
        self.db()
            .conn()
            .execute(
                "INSERT INTO phases (id, code, name, description, sort_order, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                libsql::params![
                    id.as_str(),
                    code.as_str(),
                    name.as_str(),
                    input.description.as_deref(),
                    input.sort_order,
                    now.as_str()
                ],
            )
            .await?;

        tracing::debug!(user = %ctx.user, phase = %id, %code, "phase created");
        self.get_phase(&id).await
    }

    pub async fn update_phase(
        &self,
        ctx: &SessionContext,
        id: &RecordId,
        update: PhaseUpdate,
    ) -> Result<Phase, DatabaseError> {
        ctx.require_admin("phase.update")?;
        let current = self.get_phase(id).await?;
        if update.is_empty() {
            return Ok(current);
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref code) = update.code {
            let code = required("code", code)?;
            self.ensure_phase_code_free(&code, Some(id)).await?;
            sets.push(format!("code = ?{idx}"));
            params.push(code.into());
            idx += 1;
        }
        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(required("name", name)?.into());
            idx += 1;
        }
        if let Some(ref description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(sort_order) = update.sort_order {
            sets.push(format!("sort_order = ?{idx}"));
            params.push(sort_order.into());
            idx += 1;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(id.as_str().into());
        let sql = format!("UPDATE phases SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        tracing::debug!(user = %ctx.user, phase = %id, "phase updated");
        self.get_phase(id).await
    }

    /// Delete a phase after checking nothing references it.
    pub async fn delete_phase(
        &self,
        ctx: &SessionContext,
        id: &RecordId,
    ) -> Result<(), DatabaseError> {
        ctx.require_admin("phase.delete")?;
        self.get_phase(id).await?;

        let references = self.count_phase_references(id).await?;
        if references > 0 {
            return Err(CoreError::InUse {
                entity_type: "phase".to_string(),
                id: id.to_string(),
                referenced_by: "test objective".to_string(),
                references,
            }
            .into());
        }

        self.db()
            .conn()
            .execute("DELETE FROM phases WHERE id = ?1", [id.as_str()])
            .await?;
        tracing::debug!(user = %ctx.user, phase = %id, "phase deleted");
        Ok(())
    }

    /// Number of test objectives pointing at the phase.
    pub async fn count_phase_references(&self, id: &RecordId) -> Result<u64, DatabaseError> {
        let mut rows = self
            .db()
            .query_with("SELECT COUNT(*) FROM test_objectives WHERE phase_id = ?1", || {
                libsql::params_from_iter([id.as_str()])
            })
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count = row.get::<i64>(0)?;
        u64::try_from(count).map_err(|_| DatabaseError::InvalidState(format!("negative count {count}")))
    }

    async fn ensure_phase_code_free(
        &self,
        code: &str,
        except: Option<&RecordId>,
    ) -> Result<(), DatabaseError> {
        let except = except.map_or("", RecordId::as_str);
        let mut rows = self
            .db()
            .query_with(
                "SELECT id FROM phases WHERE lower(code) = lower(?1) AND id != ?2",
                || libsql::params_from_iter([code, except]),
            )
            .await?;
        if rows.next().await?.is_some() {
            return Err(
                CoreError::Validation(format!("phase code '{code}' already exists")).into(),
            );
        }
        Ok(())
    }
}
