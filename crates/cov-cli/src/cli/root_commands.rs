use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Subcommand};
use cov_analytics::filter::{DashboardFilter, FilterValue};

use crate::cli::subcommands::PhaseCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Scope counts and execution summary for a filter.
    Stats(StatsArgs),
    /// Open failures, newest first, one page at a time.
    Failures(FailuresArgs),
    /// Per-module test-case census for a stakeholder group.
    Census(CensusArgs),
    /// Phase configuration (admin).
    Phase {
        #[command(subcommand)]
        action: PhaseCommands,
    },
    /// Load a JSON snapshot into the database (admin).
    Import(ImportArgs),
}

/// The three dashboard filter dimensions. Each takes a record id or `all`.
#[derive(Clone, Debug, Args)]
pub struct FilterArgs {
    #[arg(long, default_value = "all")]
    pub company: FilterValue,
    #[arg(long, default_value = "all")]
    pub phase: FilterValue,
    #[arg(long, default_value = "all")]
    pub module: FilterValue,
}

impl FilterArgs {
    #[must_use]
    pub fn to_filter(&self) -> DashboardFilter {
        DashboardFilter::new(
            self.company.clone(),
            self.phase.clone(),
            self.module.clone(),
        )
    }
}

#[derive(Clone, Debug, Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Clone, Debug, Args)]
pub struct FailuresArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// 1-based page number.
    #[arg(long, default_value_t = 1, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub page: usize,
    /// Rows per page (defaults to `dashboard.failed_page_size`).
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub page_size: Option<usize>,
}

#[derive(Clone, Debug, Args)]
pub struct CensusArgs {
    /// Stakeholder group id.
    pub group: String,
}

#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// Snapshot file (JSON).
    pub file: PathBuf,
}
