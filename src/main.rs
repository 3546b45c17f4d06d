use anyhow::{Context, Result};
use clap::Parser;

use defindex::cli::{Cli, Commands};
use defindex::config::Config;
use defindex::indexer::absolute_path;
use defindex::logging::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let dir = match cli.dir {
        Some(dir) => absolute_path(&dir)
            .with_context(|| format!("Failed to resolve project directory {}", dir.display()))?,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let config = Config::load(&dir)?;

    // The guard MUST be held until program exit to ensure logs are flushed
    let _logging_guard = init_logging(&config.logging, &dir, cli.verbose)?;
    tracing::debug!("Loaded configuration from: {}", dir.display());

    match cli.command {
        Commands::Init { force } => defindex::commands::init::run(&dir, force)?,
        Commands::Build { flush, output } => {
            defindex::commands::build::run(&dir, &config, flush, output.as_deref())?
        }
        Commands::Flush => defindex::commands::flush::run(&dir, &config)?,
        Commands::Lookup { kind, name } => {
            defindex::commands::lookup::run(&dir, &config, &kind, &name)?
        }
        Commands::Status => defindex::commands::status::run(&dir, &config)?,
    }

    Ok(())
}
