use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,              // global --quiet
    pub no_color: bool,           // global --no-color
    pub dry_run: bool,            // global --dry-run
    pub config: Option<PathBuf>,  // global --config
}

#[derive(Parser)]
#[command(name = "intentedit")]
#[command(about = "Apply batches of line-oriented edit intents to text files")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress non-essential output (failures are still printed)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show what would change without writing files or backups
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable debug logging (INTENTEDIT_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./intentedit.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse, schedule and apply every intent in a file
    Run(RunArgs),

    /// Validate intent syntax without touching any file
    Check(CheckArgs),

    /// Show the execution order and same-file hazards
    Plan(PlanArgs),

    /// Initialize an intentedit.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Intent file ("-" for stdin; defaults to the configured intent_file)
    pub intent_file: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Intent file ("-" for stdin; defaults to the configured intent_file)
    pub intent_file: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct PlanArgs {
    /// Intent file ("-" for stdin; defaults to the configured intent_file)
    pub intent_file: Option<PathBuf>,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long, conflicts_with = "stdout")]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
