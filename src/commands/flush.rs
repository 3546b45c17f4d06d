use anyhow::{Context, Result};
use std::path::Path;

use crate::indexing::AutoloadService;
use crate::Config;

pub fn run(dir: &Path, config: &Config) -> Result<()> {
    let service = AutoloadService::from_config(config, dir);

    for root in &config.roots {
        service
            .flush_root(root)
            .with_context(|| format!("Failed to flush cache for {}", root.path.display()))?;
        println!("✓ Flushed {}", root.path.display());
    }

    Ok(())
}
