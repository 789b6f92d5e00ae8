mod add;
mod delete;
mod list;
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PhaseCommands;
use crate::context::AppContext;

/// Handle `covb phase`.
pub async fn handle(
    action: &PhaseCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        PhaseCommands::List => list::run(ctx, flags).await,
        PhaseCommands::Add {
            code,
            name,
            description,
            sort_order,
        } => add::run(code, name, description.as_deref(), *sort_order, ctx, flags).await,
        PhaseCommands::Update {
            id,
            code,
            name,
            description,
            clear_description,
            sort_order,
        } => {
            update::run(
                id,
                code.as_deref(),
                name.as_deref(),
                update::DescriptionChange::from_flags(description.clone(), *clear_description),
                *sort_order,
                ctx,
                flags,
            )
            .await
        }
        PhaseCommands::Delete { id } => delete::run(id, ctx, flags).await,
    }
}
