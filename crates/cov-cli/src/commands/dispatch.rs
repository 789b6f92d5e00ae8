use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Stats(args) => commands::stats::handle(&args, ctx, flags).await,
        Commands::Failures(args) => commands::failures::handle(&args, ctx, flags).await,
        Commands::Census(args) => commands::census::handle(&args, ctx, flags).await,
        Commands::Phase { action } => commands::phase::handle(&action, ctx, flags).await,
        Commands::Import(args) => commands::import::handle(&args, ctx, flags).await,
    }
}
