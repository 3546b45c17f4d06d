use anyhow::{anyhow, bail, Context, Result};
use std::path::Path;

use crate::indexing::AutoloadService;
use crate::symbol::SymbolKind;
use crate::Config;

pub fn run(dir: &Path, config: &Config, kind: &str, name: &str) -> Result<()> {
    let kind = SymbolKind::parse(&kind.to_lowercase()).ok_or_else(|| {
        anyhow!(
            "Unknown symbol kind '{}' (expected class, function, type or constant)",
            kind
        )
    })?;

    let service = AutoloadService::from_config(config, dir);
    let map = service
        .build(&config.roots, false)
        .context("Failed to build symbol index")?;

    let Some(relative) = map.lookup(kind, name) else {
        bail!("No {} named '{}' is declared in the configured roots", kind, name);
    };

    println!("{}", relative);
    if let Some(resolved) = map.resolve(kind, name, service.project_root()) {
        println!("  → {}", resolved.display());
    }

    Ok(())
}
