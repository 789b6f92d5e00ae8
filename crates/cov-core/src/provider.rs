//! The relational data provider the aggregator reads through.
//!
//! Implemented by `cov-db` over libSQL and by in-memory fixtures in tests.
//! Methods return `Send` futures so a pass can fan its requests out with
//! `tokio::join!` and be driven from spawned tasks.

use std::future::Future;

use crate::entities::{GroupTorLink, TestObjective, TorTestCaseLink};
use crate::enums::Population;
use crate::errors::ProviderError;
use crate::ids::RecordId;
use crate::query::ObjectiveQuery;

/// What a provider can evaluate on its side of the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// The provider can apply an equality predicate on the one-to-many
    /// company link relation. Even when set, results are still refined
    /// locally.
    pub company_pushdown: bool,
}

pub trait DataProvider: Sync {
    fn capabilities(&self) -> ProviderCapabilities;

    /// Objectives matching `query`, with scenarios, TOR and company links
    /// expanded.
    fn fetch_objectives(
        &self,
        query: &ObjectiveQuery,
    ) -> impl Future<Output = Result<Vec<TestObjective>, ProviderError>> + Send;

    /// Row count of a whole population, without materializing rows.
    fn count(
        &self,
        population: Population,
    ) -> impl Future<Output = Result<u64, ProviderError>> + Send;

    /// TOR links of one stakeholder group, with each TOR's module.
    fn fetch_group_tor_links(
        &self,
        group_id: &RecordId,
    ) -> impl Future<Output = Result<Vec<GroupTorLink>, ProviderError>> + Send;

    /// TOR → test case links restricted to `tor_ids`.
    fn fetch_tor_test_cases(
        &self,
        tor_ids: &[RecordId],
    ) -> impl Future<Output = Result<Vec<TorTestCaseLink>, ProviderError>> + Send;
}
