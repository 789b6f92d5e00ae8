//! `DataProvider` over libSQL.
//!
//! `ObjectiveQuery` is compiled into one `WHERE` clause over
//! `test_objectives o LEFT JOIN tors t`. Inner joins become existence
//! checks, predicates become `=` / `IN` tests, and a company predicate
//! becomes an `EXISTS` over `objective_companies`. Nested scenarios and
//! company links are loaded with a second and third query restricted to the
//! same id set, then grouped in memory.

use std::collections::HashMap;

use cov_core::entities::{CompanyLink, GroupTorLink, Scenario, TestObjective, TorRef, TorTestCaseLink};
use cov_core::enums::Population;
use cov_core::errors::ProviderError;
use cov_core::ids::RecordId;
use cov_core::provider::{DataProvider, ProviderCapabilities};
use cov_core::query::{Field, JoinKind, ObjectiveQuery, Predicate, Relation};

use crate::error::DatabaseError;
use crate::helpers::{get_id, get_opt_id, get_opt_string, parse_optional_datetime, placeholders};
use crate::service::CovService;

const OBJECTIVE_FROM: &str = "FROM test_objectives o LEFT JOIN tors t ON t.id = o.tor_id";

/// A compiled `WHERE` clause with its positional parameters.
#[derive(Debug, Default)]
struct CompiledFilter {
    conditions: Vec<String>,
    params: Vec<libsql::Value>,
}

impl CompiledFilter {
    fn compile(query: &ObjectiveQuery) -> Self {
        let mut filter = Self::default();
        for join in query.joins() {
            if join.kind != JoinKind::Inner {
                continue;
            }
            filter.conditions.push(
                match join.relation {
                    Relation::Scenarios => {
                        "EXISTS (SELECT 1 FROM scenarios s WHERE s.objective_id = o.id)"
                    }
                    Relation::Tor => "t.id IS NOT NULL",
                    Relation::CompanyLinks => {
                        "EXISTS (SELECT 1 FROM objective_companies oc WHERE oc.objective_id = o.id)"
                    }
                }
                .to_string(),
            );
        }
        for predicate in query.predicates() {
            filter.push_predicate(predicate);
        }
        filter
    }

    fn push_predicate(&mut self, predicate: &Predicate) {
        let values: Vec<&RecordId> = match predicate {
            Predicate::Eq { value, .. } => vec![value],
            Predicate::In { values, .. } => values.iter().collect(),
        };
        if values.is_empty() {
            self.conditions.push("0".to_string());
            return;
        }

        let start = self.params.len() + 1;
        let test = if values.len() == 1 {
            format!("= ?{start}")
        } else {
            format!("IN ({})", placeholders(start, values.len()))
        };
        self.params
            .extend(values.into_iter().map(|id| libsql::Value::from(id.as_str())));

        self.conditions.push(match predicate.field() {
            Field::ObjectivePhase => format!("o.phase_id {test}"),
            Field::TorModule => format!("t.module_id {test}"),
            Field::LinkedCompany => format!(
                "EXISTS (SELECT 1 FROM objective_companies oc \
                 WHERE oc.objective_id = o.id AND oc.company_id {test})"
            ),
        });
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    fn params(&self) -> libsql::params::Params {
        libsql::params::Params::Positional(self.params.clone())
    }
}

fn row_to_objective(row: &libsql::Row, expand_tor: bool) -> Result<TestObjective, DatabaseError> {
    let tor_id = get_opt_id(row, 5)?;
    let tor = if expand_tor {
        match tor_id {
            Some(id) => Some(TorRef {
                id,
                module_id: get_opt_id(row, 6)?,
            }),
            None => None,
        }
    } else {
        None
    };
    Ok(TestObjective {
        id: get_id(row, 0)?,
        code: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        phase_id: get_opt_id(row, 3)?,
        module_id: get_opt_id(row, 4)?,
        tor,
        companies: Vec::new(),
        scenarios: Vec::new(),
    })
}

fn row_to_scenario(row: &libsql::Row) -> Result<Scenario, DatabaseError> {
    let id = get_id(row, 0)?;
    let raw_updated_at = get_opt_string(row, 5)?;
    let updated_at = match parse_optional_datetime(raw_updated_at.as_deref()) {
        Ok(at) => at,
        Err(error) => {
            tracing::warn!(scenario = %id, %error, "unparseable scenario timestamp; treating as missing");
            None
        }
    };
    Ok(Scenario {
        id,
        objective_id: get_id(row, 1)?,
        result: get_opt_string(row, 2)?,
        severity: get_opt_string(row, 3)?,
        fix_type: get_opt_string(row, 4)?,
        updated_at,
    })
}

impl CovService {
    async fn load_objectives(
        &self,
        query: &ObjectiveQuery,
    ) -> Result<Vec<TestObjective>, DatabaseError> {
        let filter = CompiledFilter::compile(query);
        let where_clause = filter.where_clause();
        let expand_tor = query.join_kind(Relation::Tor).is_some();

        let sql = format!(
            "SELECT o.id, o.code, o.name, o.phase_id, o.module_id, o.tor_id, t.module_id \
             {OBJECTIVE_FROM} {where_clause} ORDER BY o.code, o.id"
        );
        let mut rows = self.db().query_with(&sql, || filter.params()).await?;
        let mut objectives = Vec::new();
        let mut index: HashMap<RecordId, usize> = HashMap::new();
        while let Some(row) = rows.next().await? {
            let objective = row_to_objective(&row, expand_tor)?;
            index.insert(objective.id.clone(), objectives.len());
            objectives.push(objective);
        }
        if objectives.is_empty() {
            return Ok(objectives);
        }

        let id_subquery = format!("SELECT o.id {OBJECTIVE_FROM} {where_clause}");

        if query.join_kind(Relation::Scenarios).is_some() {
            let sql = format!(
                "SELECT id, objective_id, result, severity, fix_type, updated_at FROM scenarios \
                 WHERE objective_id IN ({id_subquery}) ORDER BY objective_id, id"
            );
            let mut rows = self.db().query_with(&sql, || filter.params()).await?;
            while let Some(row) = rows.next().await? {
                let scenario = row_to_scenario(&row)?;
                if let Some(&slot) = index.get(&scenario.objective_id) {
                    objectives[slot].scenarios.push(scenario);
                }
            }
        }

        if query.join_kind(Relation::CompanyLinks).is_some() {
            let sql = format!(
                "SELECT objective_id, company_id FROM objective_companies \
                 WHERE objective_id IN ({id_subquery}) ORDER BY objective_id, company_id"
            );
            let mut rows = self.db().query_with(&sql, || filter.params()).await?;
            while let Some(row) = rows.next().await? {
                let link = CompanyLink {
                    objective_id: get_id(&row, 0)?,
                    company_id: get_id(&row, 1)?,
                };
                if let Some(&slot) = index.get(&link.objective_id) {
                    objectives[slot].companies.push(link);
                }
            }
        }

        tracing::debug!(rows = objectives.len(), "objectives fetched");
        Ok(objectives)
    }

    async fn count_population(&self, population: Population) -> Result<u64, DatabaseError> {
        let table = match population {
            Population::Tor => "tors",
            Population::Module => "modules",
            Population::Objective => "test_objectives",
            Population::Scenario => "scenarios",
        };
        self.db()
            .query_count(&format!("SELECT COUNT(*) FROM {table}"))
            .await
    }

    async fn load_group_tor_links(
        &self,
        group_id: &RecordId,
    ) -> Result<Vec<GroupTorLink>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT gt.group_id, gt.tor_id, t.module_id, m.name
                 FROM group_tors gt
                 JOIN tors t ON t.id = gt.tor_id
                 JOIN modules m ON m.id = t.module_id
                 WHERE gt.group_id = ?1
                 ORDER BY gt.tor_id",
                || libsql::params_from_iter([group_id.as_str()]),
            )
            .await?;
        let mut links = Vec::new();
        while let Some(row) = rows.next().await? {
            links.push(GroupTorLink {
                group_id: get_id(&row, 0)?,
                tor_id: get_id(&row, 1)?,
                module_id: get_id(&row, 2)?,
                module_name: row.get::<String>(3)?,
            });
        }
        Ok(links)
    }

    async fn load_tor_test_cases(
        &self,
        tor_ids: &[RecordId],
    ) -> Result<Vec<TorTestCaseLink>, DatabaseError> {
        if tor_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT tor_id, test_case_id FROM tor_test_cases WHERE tor_id IN ({}) \
             ORDER BY tor_id, test_case_id",
            placeholders(1, tor_ids.len())
        );
        let mut rows = self
            .db()
            .query_with(&sql, || {
                libsql::params_from_iter(tor_ids.iter().map(RecordId::as_str))
            })
            .await?;
        let mut links = Vec::new();
        while let Some(row) = rows.next().await? {
            links.push(TorTestCaseLink {
                tor_id: get_id(&row, 0)?,
                test_case_id: get_id(&row, 1)?,
            });
        }
        Ok(links)
    }
}

impl DataProvider for CovService {
    fn capabilities(&self) -> ProviderCapabilities {
        self.provider_capabilities()
    }

    async fn fetch_objectives(
        &self,
        query: &ObjectiveQuery,
    ) -> Result<Vec<TestObjective>, ProviderError> {
        self.load_objectives(query)
            .await
            .map_err(|e| e.into_provider("fetch_objectives"))
    }

    async fn count(&self, population: Population) -> Result<u64, ProviderError> {
        self.count_population(population)
            .await
            .map_err(|e| e.into_provider("count"))
    }

    async fn fetch_group_tor_links(
        &self,
        group_id: &RecordId,
    ) -> Result<Vec<GroupTorLink>, ProviderError> {
        self.load_group_tor_links(group_id)
            .await
            .map_err(|e| e.into_provider("fetch_group_tor_links"))
    }

    async fn fetch_tor_test_cases(
        &self,
        tor_ids: &[RecordId],
    ) -> Result<Vec<TorTestCaseLink>, ProviderError> {
        self.load_tor_test_cases(tor_ids)
            .await
            .map_err(|e| e.into_provider("fetch_tor_test_cases"))
    }
}
