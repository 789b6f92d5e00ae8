use chrono::{DateTime, Utc};
use cov_analytics::execution::ExecutionSummary;
use cov_analytics::filter::DashboardFilter;
use cov_analytics::pipeline::{RefreshOutcome, Stage};
use cov_analytics::scope::ScopeCounts;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::StatsArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Scope counts and execution summary for one filter.
#[derive(Debug, Serialize)]
struct StatsReport {
    filter: DashboardFilter,
    scope: Option<ScopeCounts>,
    execution: Option<ExecutionSummary>,
    /// 0..=100, `pass + fail + not_run` over assigned.
    overall_progress: Option<u8>,
    open_failures: usize,
    failed_stages: Vec<Stage>,
    can_configure: bool,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Handle `covb stats`.
pub async fn handle(args: &StatsArgs, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = args.filter.to_filter();
    let spinner = Progress::spinner(&format!("aggregating ({filter})"));

    let outcome = ctx
        .dashboard
        .refresh(&ctx.session, &ctx.service, filter, Utc::now())
        .await;
    spinner.finish_clear();

    // One pass per process, so nothing can supersede this refresh.
    let RefreshOutcome::Applied { failed_stages, .. } = outcome else {
        anyhow::bail!("dashboard refresh did not complete");
    };
    if failed_stages.len() == 2 {
        anyhow::bail!("every aggregation stage failed; run with --verbose for provider errors");
    }

    let snapshot = ctx.dashboard.snapshot().await;
    let report = StatsReport {
        overall_progress: snapshot
            .execution
            .as_ref()
            .map(|summary| summary.percentages.overall_progress()),
        open_failures: snapshot.failures.len(),
        filter: snapshot.filter,
        scope: snapshot.scope,
        execution: snapshot.execution,
        failed_stages,
        can_configure: snapshot.can_configure,
        refreshed_at: snapshot.refreshed_at,
    };
    output(&report, flags.format)
}
