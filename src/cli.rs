//! Command line input handling

use std::path::PathBuf;

/// Command line arguments
#[derive(clap::Parser)]
#[command(author, version, about, disable_help_subcommand = true)]
pub struct Args {
    /// Path to the config file (default: ~/.config/manual-sort/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand)]
pub enum Command {
    /// Sort items by picking the preferred one out of two, again and again
    Sort(SortArgs),
    /// Show how far a saved sort has come
    Status(StatusArgs),
    /// Create a default config file
    Init,
}

#[derive(clap::Args)]
pub struct SortArgs {
    /// File with one item per line, or a JSON array of strings
    #[arg(long)]
    pub items: Option<PathBuf>,
    /// Inline item (repeatable)
    #[arg(long = "item")]
    pub inline_items: Vec<String>,
    /// File holding the progress between sessions
    #[arg(long)]
    pub state: Option<PathBuf>,
    /// Throw away saved progress and start over
    #[arg(long)]
    pub fresh: bool,
    /// Only save when asked to, not after every decision
    #[arg(long)]
    pub no_autosave: bool,
    /// Seed for the initial shuffle
    #[arg(long)]
    pub seed: Option<u64>,
    /// Also write the final order to this file, one item per line
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Print the final order as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct StatusArgs {
    /// File holding the progress between sessions
    #[arg(long)]
    pub state: Option<PathBuf>,
}
