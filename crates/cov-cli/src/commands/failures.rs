use chrono::{DateTime, Utc};
use cov_analytics::failures::{FailedIssue, Page, paginate, report_failures};
use cov_analytics::filter::{DashboardFilter, apply_post_filter, compose};
use cov_core::provider::DataProvider;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::cli::root_commands::FailuresArgs;
use crate::context::AppContext;
use crate::output::output;

/// Fetch, refine and page the open failures for `filter`.
pub async fn failure_page<P: DataProvider>(
    provider: &P,
    filter: &DashboardFilter,
    page: usize,
    page_size: usize,
    now: DateTime<Utc>,
) -> anyhow::Result<Page<FailedIssue>> {
    let query = compose(filter, provider.capabilities());
    let rows = apply_post_filter(&query, provider.fetch_objectives(&query).await?);
    let issues = report_failures(&rows, now);
    tracing::debug!(%filter, open = issues.len(), "failures collected");
    Ok(paginate(issues, page, page_size)?)
}

/// Handle `covb failures`.
pub async fn handle(
    args: &FailuresArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let page_size = args.page_size.unwrap_or_else(|| ctx.failed_page_size());
    let page = failure_page(
        &ctx.service,
        &args.filter.to_filter(),
        args.page,
        page_size,
        Utc::now(),
    )
    .await?;

    if flags.format == OutputFormat::Table {
        output(&page.items, flags.format)?;
        if !flags.quiet {
            println!(
                "page {}/{} ({} open)",
                page.page,
                page.total_pages.max(1),
                page.total
            );
        }
        return Ok(());
    }
    output(&page, flags.format)
}
