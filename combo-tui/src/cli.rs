//! CLI argument parsing for the combo builder
//!
//! Makes the TUI the default entry point when no subcommand is provided.

use clap::{Args, Parser, Subcommand, ValueEnum};
use combo_core::catalog::PlanCategory;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    /// Residential plans (casa)
    Residential,
    /// Business plans (empresa)
    Business,
}

impl From<CategoryArg> for PlanCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Residential => PlanCategory::Residential,
            CategoryArg::Business => PlanCategory::Business,
        }
    }
}

#[derive(Parser)]
#[command(name = "combo")]
#[command(about = "🛒 Combo builder for Entre internet, TV and app bundles")]
#[command(long_about = "🛒 Combo builder for Entre internet, TV and app bundles\n\n\
    Pick a connection plan, add TV, streaming apps and equipment, and get an\n\
    itemized monthly quote plus a ready-to-send order message.\n\n\
    Run without arguments to launch the interactive TUI wizard.\n\
    Or use subcommands for CLI scripting.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Load the product catalog from a TOML file instead of the built-in one
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Dump TUI step render text to stdout and exit
    #[arg(long, global = true)]
    pub dump_tui: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// 🧾 Price a selection and print the quote (CLI mode for scripting)
    Quote(QuoteArgs),

    /// 📋 List everything the catalog offers
    Catalog,
}

#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    /// Customer segment
    #[arg(long, value_enum, default_value = "residential")]
    pub category: CategoryArg,

    /// Apply a selection profile first (e.g. profile-music)
    #[arg(long)]
    pub profile: Option<String>,

    /// Connection plan id (e.g. res-800)
    #[arg(long)]
    pub plan: Option<String>,

    /// TV bundle id (e.g. tv-essential)
    #[arg(long)]
    pub tv: Option<String>,

    /// Streaming app id (repeatable)
    #[arg(long = "app")]
    pub apps: Vec<String>,

    /// Mesh Wi-Fi point id (e.g. omni-6)
    #[arg(long)]
    pub mesh: Option<String>,

    /// Battery backup id (e.g. nobreak)
    #[arg(long)]
    pub backup: Option<String>,

    /// Print only the order message
    #[arg(long)]
    pub message_only: bool,
}
