use cov_core::ids::RecordId;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct Deleted {
    id: RecordId,
    deleted: bool,
}

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let id = RecordId::new(id);
    ctx.service.delete_phase(&ctx.session, &id).await?;
    output(&Deleted { id, deleted: true }, flags.format)
}
