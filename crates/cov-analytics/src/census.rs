//! Per-module test-case census for one stakeholder group.
//!
//! A group links to TORs; TORs link to test cases; each TOR belongs to one
//! module. A test case reached through several TORs of the same module is
//! counted once for that module, and once for every other module it reaches.

use std::collections::{BTreeMap, HashMap, HashSet};

use cov_core::entities::{GroupTorLink, TorTestCaseLink};
use cov_core::ids::RecordId;
use cov_core::provider::DataProvider;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CensusEntry {
    pub module_id: RecordId,
    pub module_name: String,
    pub test_case_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModuleCensus {
    /// One entry per module the group reaches, ordered by module id.
    pub entries: Vec<CensusEntry>,
    /// Test-case links whose TOR is not among the group's TORs.
    pub skipped_links: u64,
}

impl ModuleCensus {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn total_test_cases(&self) -> u64 {
        self.entries.iter().map(|e| e.test_case_count).sum()
    }
}

/// Build the census from a group's TOR links and the test-case links of
/// those TORs.
#[must_use]
pub fn build_census(tor_links: &[GroupTorLink], test_case_links: &[TorTestCaseLink]) -> ModuleCensus {
    let tor_module: HashMap<&RecordId, &RecordId> = tor_links
        .iter()
        .map(|link| (&link.tor_id, &link.module_id))
        .collect();

    let mut buckets: BTreeMap<&RecordId, CensusEntry> = BTreeMap::new();
    for link in tor_links {
        buckets.entry(&link.module_id).or_insert_with(|| CensusEntry {
            module_id: link.module_id.clone(),
            module_name: link.module_name.clone(),
            test_case_count: 0,
        });
    }

    let mut seen: HashSet<(&RecordId, &RecordId)> = HashSet::new();
    let mut skipped_links = 0;
    for link in test_case_links {
        let Some(module_id) = tor_module.get(&link.tor_id) else {
            tracing::debug!(tor = %link.tor_id, test_case = %link.test_case_id, "test case link to unknown TOR skipped");
            skipped_links += 1;
            continue;
        };
        if seen.insert((module_id, &link.test_case_id)) {
            if let Some(entry) = buckets.get_mut(module_id) {
                entry.test_case_count += 1;
            }
        }
    }

    ModuleCensus {
        entries: buckets.into_values().collect(),
        skipped_links,
    }
}

/// Fetch a group's links and build its census.
///
/// A group without TOR links yields an empty census.
///
/// # Errors
///
/// Returns `AnalyticsError::Provider` when either fetch fails.
pub async fn census_for_group<P: DataProvider>(
    provider: &P,
    group_id: &RecordId,
) -> Result<ModuleCensus, AnalyticsError> {
    let tor_links = provider.fetch_group_tor_links(group_id).await?;
    if tor_links.is_empty() {
        tracing::debug!(group = %group_id, "group has no TOR links");
        return Ok(ModuleCensus::default());
    }
    let tor_ids: Vec<RecordId> = tor_links
        .iter()
        .map(|link| link.tor_id.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let test_case_links = provider.fetch_tor_test_cases(&tor_ids).await?;
    let census = build_census(&tor_links, &test_case_links);
    tracing::debug!(
        group = %group_id,
        modules = census.entries.len(),
        test_cases = census.total_test_cases(),
        "census built"
    );
    Ok(census)
}
