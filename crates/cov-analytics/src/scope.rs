//! Population counts for the current filter.
//!
//! Without a filter the provider counts whole populations. With a filter the
//! composed query is materialized, refined locally, and counted here.

use std::collections::HashSet;

use cov_core::entities::TestObjective;
use cov_core::enums::Population;
use cov_core::provider::DataProvider;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::filter::{DashboardFilter, apply_post_filter, compose};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CountMode {
    /// Provider-side counts of whole populations.
    Unfiltered,
    /// Counted locally from the filtered row set.
    Filtered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScopeCounts {
    pub tor: u64,
    pub module: u64,
    pub objective: u64,
    pub scenario: u64,
    pub mode: CountMode,
}

/// Count distinct TORs, distinct direct modules, objectives and nested
/// scenarios of an already filtered row set.
#[must_use]
pub fn count_rows(rows: &[TestObjective]) -> ScopeCounts {
    let tors: HashSet<_> = rows
        .iter()
        .filter_map(|o| o.tor.as_ref().map(|tor| &tor.id))
        .collect();
    let modules: HashSet<_> = rows.iter().filter_map(|o| o.module_id.as_ref()).collect();
    ScopeCounts {
        tor: tors.len() as u64,
        module: modules.len() as u64,
        objective: rows.len() as u64,
        scenario: rows.iter().map(|o| o.scenarios.len() as u64).sum(),
        mode: CountMode::Filtered,
    }
}

/// Four concurrent population counts, passed through unchanged.
///
/// # Errors
///
/// Returns the first provider error.
pub async fn count_unfiltered<P: DataProvider>(provider: &P) -> Result<ScopeCounts, AnalyticsError> {
    let (tor, module, objective, scenario) = tokio::try_join!(
        provider.count(Population::Tor),
        provider.count(Population::Module),
        provider.count(Population::Objective),
        provider.count(Population::Scenario),
    )?;
    Ok(ScopeCounts {
        tor,
        module,
        objective,
        scenario,
        mode: CountMode::Unfiltered,
    })
}

/// Scope counts for `filter`.
///
/// # Errors
///
/// Returns `AnalyticsError::Provider` when the provider fails.
pub async fn count_scope<P: DataProvider>(
    provider: &P,
    filter: &DashboardFilter,
) -> Result<ScopeCounts, AnalyticsError> {
    if filter.is_unfiltered() {
        return count_unfiltered(provider).await;
    }
    let query = compose(filter, provider.capabilities());
    let rows = apply_post_filter(&query, provider.fetch_objectives(&query).await?);
    let counts = count_rows(&rows);
    tracing::debug!(%filter, objectives = counts.objective, "scope counted locally");
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterValue;
    use crate::test_support::helpers::{MemoryProvider, objective, scenario};
    use pretty_assertions::assert_eq;

    fn provider() -> MemoryProvider {
        let mut provider = MemoryProvider::with_objectives(vec![
            objective(
                "obj-1",
                "phs-1",
                "mod-1",
                &["cmp-1"],
                vec![scenario("obj-1", "Pass"), scenario("obj-1", "Fail")],
            ),
            objective("obj-2", "phs-1", "mod-2", &["cmp-2"], vec![scenario("obj-2", "Pass")]),
            objective("obj-3", "phs-2", "mod-1", &["cmp-1"], vec![scenario("obj-3", "Pending")]),
        ]);
        provider.counts = [
            (Population::Tor, 11),
            (Population::Module, 4),
            (Population::Objective, 120),
            (Population::Scenario, 480),
        ]
        .into_iter()
        .collect();
        provider
    }

    #[tokio::test]
    async fn unfiltered_passes_provider_counts_through() {
        let counts = count_scope(&provider(), &DashboardFilter::default())
            .await
            .unwrap();
        assert_eq!(
            counts,
            ScopeCounts {
                tor: 11,
                module: 4,
                objective: 120,
                scenario: 480,
                mode: CountMode::Unfiltered,
            }
        );
    }

    #[tokio::test]
    async fn filtered_counts_locally() {
        let filter = DashboardFilter::new(
            FilterValue::All,
            FilterValue::parse("phs-1"),
            FilterValue::All,
        );
        let counts = count_scope(&provider(), &filter).await.unwrap();
        assert_eq!(
            counts,
            ScopeCounts {
                tor: 2,
                module: 2,
                objective: 2,
                scenario: 3,
                mode: CountMode::Filtered,
            }
        );
    }

    #[tokio::test]
    async fn company_filter_applies_without_pushdown() {
        let filter = DashboardFilter::new(
            FilterValue::parse("cmp-1"),
            FilterValue::All,
            FilterValue::All,
        );
        let counts = count_scope(&provider(), &filter).await.unwrap();
        assert_eq!(counts.objective, 2);
        assert_eq!(counts.tor, 1);
        assert_eq!(counts.scenario, 3);
    }

    #[tokio::test]
    async fn provider_failure_is_reported() {
        let mut provider = provider();
        provider.fail_count = true;
        let result = count_scope(&provider, &DashboardFilter::default()).await;
        assert!(matches!(result, Err(AnalyticsError::Provider(_))));
    }

    #[test]
    fn empty_rows_count_zero() {
        let counts = count_rows(&[]);
        assert_eq!((counts.tor, counts.module, counts.objective, counts.scenario), (0, 0, 0, 0));
    }
}
