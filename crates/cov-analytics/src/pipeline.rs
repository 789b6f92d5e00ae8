//! One aggregation pass per filter change.
//!
//! A pass runs the scope counter concurrently with the execution/failure
//! fetch. Each pass takes a token from the shared [`PassSequencer`]; when it
//! finishes, its results reach the [`Dashboard`] snapshot only if no later
//! pass has started in the meantime. A stage that fails leaves its previous
//! values in the snapshot while the other stage still applies.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use cov_core::context::SessionContext;
use cov_core::provider::DataProvider;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::AnalyticsError;
use crate::execution::{ExecutionSummary, summarize};
use crate::failures::{FailedIssue, report_failures};
use crate::filter::{DashboardFilter, apply_post_filter, compose};
use crate::scope::{ScopeCounts, count_scope};

/// Monotonic pass counter shared by every pass of one dashboard.
#[derive(Debug, Clone, Default)]
pub struct PassSequencer {
    latest: Arc<AtomicU64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PassToken(u64);

impl PassToken {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl PassSequencer {
    /// Start a pass. Every earlier token stops being current.
    #[must_use]
    pub fn begin(&self) -> PassToken {
        PassToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, token: PassToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    #[must_use]
    pub fn latest(&self) -> PassToken {
        PassToken(self.latest.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Scope,
    Execution,
}

/// What the presentation layer reads.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSnapshot {
    pub filter: DashboardFilter,
    pub scope: Option<ScopeCounts>,
    pub execution: Option<ExecutionSummary>,
    pub failures: Vec<FailedIssue>,
    /// Token of the pass that last applied, 0 before the first.
    pub pass: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Whether the session may open the configuration surface.
    pub can_configure: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Results were written. `failed_stages` kept their previous values.
    Applied {
        token: PassToken,
        failed_stages: Vec<Stage>,
    },
    /// A later pass started before this one finished; results were dropped.
    Superseded { token: PassToken, latest: PassToken },
}

struct PassResults {
    scope: Result<ScopeCounts, AnalyticsError>,
    execution: Result<(ExecutionSummary, Vec<FailedIssue>), AnalyticsError>,
}

async fn execution_stage<P: DataProvider>(
    provider: &P,
    filter: &DashboardFilter,
    now: DateTime<Utc>,
) -> Result<(ExecutionSummary, Vec<FailedIssue>), AnalyticsError> {
    let query = compose(filter, provider.capabilities());
    let rows = apply_post_filter(&query, provider.fetch_objectives(&query).await?);
    Ok((summarize(&rows), report_failures(&rows, now)))
}

#[derive(Debug, Default)]
pub struct Dashboard {
    sequencer: PassSequencer,
    snapshot: RwLock<DashboardSnapshot>,
}

impl Dashboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn sequencer(&self) -> &PassSequencer {
        &self.sequencer
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Run one pass for `filter` and apply it unless superseded.
    pub async fn refresh<P: DataProvider>(
        &self,
        ctx: &SessionContext,
        provider: &P,
        filter: DashboardFilter,
        now: DateTime<Utc>,
    ) -> RefreshOutcome {
        let token = self.sequencer.begin();
        tracing::debug!(pass = token.value(), %filter, user = %ctx.user, "pass started");

        let (scope, execution) = tokio::join!(
            count_scope(provider, &filter),
            execution_stage(provider, &filter, now),
        );
        self.apply(ctx, token, filter, now, PassResults { scope, execution })
            .await
    }

    async fn apply(
        &self,
        ctx: &SessionContext,
        token: PassToken,
        filter: DashboardFilter,
        now: DateTime<Utc>,
        results: PassResults,
    ) -> RefreshOutcome {
        let mut snapshot = self.snapshot.write().await;
        if !self.sequencer.is_current(token) {
            let latest = self.sequencer.latest();
            tracing::debug!(pass = token.value(), latest = latest.value(), "pass superseded");
            return RefreshOutcome::Superseded { token, latest };
        }

        let mut failed_stages = Vec::new();
        match results.scope {
            Ok(scope) => snapshot.scope = Some(scope),
            Err(error) => {
                tracing::warn!(pass = token.value(), %error, "scope stage failed; keeping previous counts");
                failed_stages.push(Stage::Scope);
            }
        }
        match results.execution {
            Ok((summary, failures)) => {
                snapshot.execution = Some(summary);
                snapshot.failures = failures;
            }
            Err(error) => {
                tracing::warn!(pass = token.value(), %error, "execution stage failed; keeping previous summary");
                failed_stages.push(Stage::Execution);
            }
        }

        snapshot.filter = filter;
        snapshot.pass = token.value();
        snapshot.refreshed_at = Some(now);
        snapshot.can_configure = ctx.is_admin();
        RefreshOutcome::Applied {
            token,
            failed_stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterValue;
    use crate::test_support::helpers::{MemoryProvider, failed, objective, scenario};
    use chrono::TimeZone;
    use cov_core::enums::Population;
    use pretty_assertions::assert_eq;
    use tokio::sync::Notify;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn rows() -> Vec<cov_core::entities::TestObjective> {
        vec![
            objective(
                "obj-1",
                "phs-1",
                "mod-1",
                &["cmp-1"],
                vec![
                    scenario("obj-1", "Pass"),
                    failed("obj-1", "Fail", "Critical bug", "UI", None),
                ],
            ),
            objective("obj-2", "phs-2", "mod-2", &["cmp-2"], vec![scenario("obj-2", "Not Run")]),
        ]
    }

    fn provider() -> MemoryProvider {
        let mut provider = MemoryProvider::with_objectives(rows());
        provider.counts = Population::ALL.into_iter().map(|p| (p, 9)).collect();
        provider
    }

    fn phase(id: &str) -> DashboardFilter {
        DashboardFilter::new(FilterValue::All, FilterValue::parse(id), FilterValue::All)
    }

    #[test]
    fn tokens_increase_and_only_latest_is_current() {
        let sequencer = PassSequencer::default();
        let first = sequencer.begin();
        let second = sequencer.clone().begin();
        assert!(second > first);
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
    }

    #[tokio::test]
    async fn refresh_applies_all_stages() {
        let dashboard = Dashboard::new();
        let outcome = dashboard
            .refresh(&SessionContext::admin("ana"), &provider(), DashboardFilter::default(), now())
            .await;
        assert!(matches!(
            outcome,
            RefreshOutcome::Applied { ref failed_stages, .. } if failed_stages.is_empty()
        ));

        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.scope.unwrap().tor, 9);
        let execution = snapshot.execution.unwrap();
        assert_eq!(execution.assigned, 3);
        assert_eq!(execution.failed, 1);
        assert_eq!(snapshot.failures.len(), 1);
        assert_eq!(snapshot.pass, 1);
        assert!(snapshot.can_configure);
    }

    #[tokio::test]
    async fn failing_stage_keeps_previous_values() {
        let dashboard = Dashboard::new();
        let viewer = SessionContext::viewer("guest");
        dashboard
            .refresh(&viewer, &provider(), DashboardFilter::default(), now())
            .await;
        let before = dashboard.snapshot().await;

        let mut broken = provider();
        broken.fail_fetch = true;
        broken.counts = Population::ALL.into_iter().map(|p| (p, 1)).collect();
        let outcome = dashboard
            .refresh(&viewer, &broken, DashboardFilter::default(), now())
            .await;
        assert_eq!(
            outcome,
            RefreshOutcome::Applied {
                token: PassToken(2),
                failed_stages: vec![Stage::Execution],
            }
        );

        let after = dashboard.snapshot().await;
        assert_eq!(after.execution, before.execution);
        assert_eq!(after.failures, before.failures);
        assert_eq!(after.scope.unwrap().tor, 1, "scope stage still applied");
        assert!(!after.can_configure);
    }

    #[tokio::test]
    async fn superseded_pass_is_discarded() {
        let dashboard = Dashboard::new();
        let ctx = SessionContext::viewer("guest");
        let gate = Arc::new(Notify::new());
        let mut slow = provider();
        slow.gate = Some(Arc::clone(&gate));
        let fast = provider();

        let slow_pass = dashboard.refresh(&ctx, &slow, phase("phs-1"), now());
        let fast_pass = async {
            let outcome = dashboard.refresh(&ctx, &fast, phase("phs-2"), now()).await;
            gate.notify_waiters();
            outcome
        };
        let (slow_outcome, fast_outcome) = tokio::join!(slow_pass, fast_pass);

        assert_eq!(
            slow_outcome,
            RefreshOutcome::Superseded {
                token: PassToken(1),
                latest: PassToken(2),
            }
        );
        assert!(matches!(fast_outcome, RefreshOutcome::Applied { token: PassToken(2), .. }));

        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.filter, phase("phs-2"));
        assert_eq!(snapshot.pass, 2);
        assert_eq!(snapshot.execution.unwrap().not_run, 1);
    }
}
