use clap::Subcommand;

/// Phase configuration commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PhaseCommands {
    /// List phases in display order.
    List,
    /// Create a phase.
    Add {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        sort_order: i64,
    },
    /// Update a phase.
    Update {
        id: String,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description.
        #[arg(long)]
        clear_description: bool,
        #[arg(long, allow_negative_numbers = true)]
        sort_order: Option<i64>,
    },
    /// Delete a phase no test objective references.
    Delete { id: String },
}
