use clap::Parser;
use intentedit::cli::{AppContext, Cli, Commands};
use intentedit::core::batch::{self, EXIT_BATCH_FAILED};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // INTENTEDIT_LOG overrides; --verbose => debug; else warn
    let filter = EnvFilter::try_from_env("INTENTEDIT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "intentedit=debug"
        } else {
            "intentedit=warn"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::Run(args) => batch::run(args, &ctx),
        Commands::Check(args) => batch::check(args, &ctx),
        Commands::Plan(args) => batch::plan(args, &ctx),
        Commands::Init(args) => intentedit::infra::config::init(args, &ctx).map(|()| 0),
        Commands::Completions(args) => intentedit::completion::run(args, &ctx).map(|()| 0),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("✗ {e:#}");
            std::process::exit(EXIT_BATCH_FAILED);
        }
    }
}
