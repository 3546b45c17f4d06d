use anyhow::{bail, Result};
use std::path::Path;
use tracing::info;

use crate::Config;

pub fn run(dir: &Path, force: bool) -> Result<()> {
    if Config::is_initialized(dir) && !force {
        bail!(
            "defindex is already initialized in {:?} (use --force to overwrite)",
            Config::config_dir(dir)
        );
    }

    let config = Config::default();
    config.save(dir)?;

    info!("Initialized defindex in {:?}", Config::config_dir(dir));
    println!(
        "✓ Created {} with default configuration",
        Config::config_path(dir).display()
    );
    println!("\nNext steps:");
    println!("  1. Edit .defindex/config.toml to list your source roots");
    println!("  2. Run 'defindex build' to build the autoload map");
    println!("  3. Run 'defindex lookup class <Name>' to find a declaration");

    Ok(())
}
