use cov_core::ids::RecordId;
use cov_db::updates::phase::{PhaseUpdate, PhaseUpdateBuilder};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// What `--description` / `--clear-description` asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionChange {
    Keep,
    Set(String),
    Clear,
}

impl DescriptionChange {
    #[must_use]
    pub fn from_flags(description: Option<String>, clear: bool) -> Self {
        match (description, clear) {
            (_, true) => Self::Clear,
            (Some(text), false) => Self::Set(text),
            (None, false) => Self::Keep,
        }
    }
}

fn build_update(
    code: Option<&str>,
    name: Option<&str>,
    description: DescriptionChange,
    sort_order: Option<i64>,
) -> anyhow::Result<PhaseUpdate> {
    if code.is_none()
        && name.is_none()
        && description == DescriptionChange::Keep
        && sort_order.is_none()
    {
        anyhow::bail!(
            "At least one of --code, --name, --description, --clear-description, or --sort-order must be provided"
        );
    }

    let mut builder = PhaseUpdateBuilder::new();
    if let Some(code) = code {
        builder = builder.code(code);
    }
    if let Some(name) = name {
        builder = builder.name(name);
    }
    match description {
        DescriptionChange::Keep => {}
        DescriptionChange::Set(text) => builder = builder.description(Some(text)),
        DescriptionChange::Clear => builder = builder.description(None),
    }
    if let Some(sort_order) = sort_order {
        builder = builder.sort_order(sort_order);
    }
    Ok(builder.build())
}

pub async fn run(
    id: &str,
    code: Option<&str>,
    name: Option<&str>,
    description: DescriptionChange,
    sort_order: Option<i64>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let update = build_update(code, name, description, sort_order)?;
    let phase = ctx
        .service
        .update_phase(&ctx.session, &RecordId::new(id), update)
        .await?;
    output(&phase, flags.format)
}
