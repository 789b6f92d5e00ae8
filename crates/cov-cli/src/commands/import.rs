use anyhow::Context;
use cov_db::repos::snapshot::Snapshot;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `covb import`.
pub async fn handle(
    args: &ImportArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let snapshot = Snapshot::from_path(&args.file)
        .with_context(|| format!("failed to load snapshot {}", args.file.display()))?;

    let progress = Progress::bar(snapshot.record_count(), "importing");
    let result = ctx
        .service
        .import_snapshot(&ctx.session, &snapshot, |section, count| {
            progress.set_message(section);
            progress.inc(count);
        })
        .await;

    match result {
        Ok(summary) => {
            progress.finish_ok("imported");
            output(&summary, flags.format)
        }
        Err(error) => {
            progress.finish_err("import rolled back");
            Err(error).context("snapshot import failed; nothing was written")
        }
    }
}
