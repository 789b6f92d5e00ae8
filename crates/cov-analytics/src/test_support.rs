//! Shared test utilities for cov-analytics unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use chrono::{DateTime, Utc};
    use cov_core::entities::{
        CompanyLink, GroupTorLink, Scenario, TestObjective, TorRef, TorTestCaseLink,
    };
    use cov_core::enums::Population;
    use cov_core::errors::ProviderError;
    use cov_core::ids::RecordId;
    use cov_core::provider::{DataProvider, ProviderCapabilities};
    use cov_core::query::ObjectiveQuery;
    use tokio::sync::Notify;

    static NEXT_SCENARIO: AtomicU64 = AtomicU64::new(1);

    pub fn scenario(objective_id: &str, result: &str) -> Scenario {
        Scenario {
            id: RecordId::new(format!(
                "scn-{}",
                NEXT_SCENARIO.fetch_add(1, Ordering::Relaxed)
            )),
            objective_id: objective_id.into(),
            result: Some(result.to_string()),
            severity: None,
            fix_type: None,
            updated_at: None,
        }
    }

    pub fn failed(
        objective_id: &str,
        result: &str,
        severity: &str,
        fix_type: &str,
        updated_at: Option<DateTime<Utc>>,
    ) -> Scenario {
        Scenario {
            severity: Some(severity.to_string()),
            fix_type: Some(fix_type.to_string()),
            updated_at,
            ..scenario(objective_id, result)
        }
    }

    /// An objective whose TOR belongs to `tor_module`.
    pub fn objective(
        id: &str,
        phase: &str,
        tor_module: &str,
        companies: &[&str],
        scenarios: Vec<Scenario>,
    ) -> TestObjective {
        TestObjective {
            id: id.into(),
            code: id.to_uppercase(),
            name: format!("Objective {id}"),
            phase_id: Some(phase.into()),
            module_id: Some(tor_module.into()),
            tor: Some(TorRef {
                id: format!("tor-{tor_module}").into(),
                module_id: Some(tor_module.into()),
            }),
            companies: companies
                .iter()
                .map(|company| CompanyLink {
                    objective_id: id.into(),
                    company_id: (*company).into(),
                })
                .collect(),
            scenarios,
        }
    }

    /// In-memory provider evaluating queries with `ObjectiveQuery::matches`.
    #[derive(Default)]
    pub struct MemoryProvider {
        pub objectives: Vec<TestObjective>,
        pub counts: HashMap<Population, u64>,
        pub group_links: Vec<GroupTorLink>,
        pub test_case_links: Vec<TorTestCaseLink>,
        pub capabilities: ProviderCapabilities,
        pub fail_fetch: bool,
        pub fail_count: bool,
        /// When set, every call waits for a notification before answering.
        pub gate: Option<Arc<Notify>>,
    }

    impl MemoryProvider {
        pub fn with_objectives(objectives: Vec<TestObjective>) -> Self {
            Self {
                objectives,
                ..Self::default()
            }
        }

        async fn wait(&self) {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
        }
    }

    impl DataProvider for MemoryProvider {
        fn capabilities(&self) -> ProviderCapabilities {
            self.capabilities
        }

        async fn fetch_objectives(
            &self,
            query: &ObjectiveQuery,
        ) -> Result<Vec<TestObjective>, ProviderError> {
            self.wait().await;
            if self.fail_fetch {
                return Err(ProviderError::Unavailable("fetch disabled".into()));
            }
            Ok(self
                .objectives
                .iter()
                .filter(|objective| query.matches(objective))
                .cloned()
                .collect())
        }

        async fn count(&self, population: Population) -> Result<u64, ProviderError> {
            self.wait().await;
            if self.fail_count {
                return Err(ProviderError::query("count", "count disabled"));
            }
            Ok(self.counts.get(&population).copied().unwrap_or_default())
        }

        async fn fetch_group_tor_links(
            &self,
            group_id: &RecordId,
        ) -> Result<Vec<GroupTorLink>, ProviderError> {
            Ok(self
                .group_links
                .iter()
                .filter(|link| &link.group_id == group_id)
                .cloned()
                .collect())
        }

        async fn fetch_tor_test_cases(
            &self,
            tor_ids: &[RecordId],
        ) -> Result<Vec<TorTestCaseLink>, ProviderError> {
            Ok(self
                .test_case_links
                .iter()
                .filter(|link| tor_ids.contains(&link.tor_id))
                .cloned()
                .collect())
        }
    }
}
