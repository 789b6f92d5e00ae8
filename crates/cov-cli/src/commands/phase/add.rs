use cov_db::repos::phase::NewPhase;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    code: &str,
    name: &str,
    description: Option<&str>,
    sort_order: i64,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let phase = ctx
        .service
        .create_phase(
            &ctx.session,
            NewPhase {
                code: code.to_string(),
                name: name.to_string(),
                description: description.map(str::to_string),
                sort_order,
            },
        )
        .await?;
    output(&phase, flags.format)
}
