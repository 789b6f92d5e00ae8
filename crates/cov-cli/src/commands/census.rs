use cov_analytics::census::census_for_group;
use cov_core::ids::RecordId;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::cli::root_commands::CensusArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `covb census`.
pub async fn handle(
    args: &CensusArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let census = census_for_group(&ctx.service, &RecordId::new(&args.group)).await?;
    if census.skipped_links > 0 {
        tracing::warn!(
            group = %args.group,
            skipped = census.skipped_links,
            "test-case links to TORs outside the group were skipped"
        );
    }

    match flags.format {
        OutputFormat::Table => output(&census.entries, flags.format),
        OutputFormat::Json | OutputFormat::Raw => output(&census, flags.format),
    }
}
