use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let env_filter = format!("sift_cli={},sift_filter={}", log_level, log_level);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .init();

    match &cli.command {
        Commands::Parse { expression } => commands::run_parse(expression),
        Commands::Render {
            expression,
            dialect,
            fields,
        } => commands::run_render(expression, dialect, fields),
        Commands::Eval {
            expression,
            metadata,
        } => commands::run_eval(expression, metadata),
        Commands::Dialects => commands::run_dialects(),
    }
}
