use anyhow::{Context, Result};
use std::path::Path;

use crate::indexing::AutoloadService;
use crate::Config;

/// Build all configured roots and emit the merged map as JSON.
pub fn run(dir: &Path, config: &Config, flush: bool, output: Option<&Path>) -> Result<()> {
    let service = AutoloadService::from_config(config, dir);
    let results = service
        .build_indexes(&config.roots, flush)
        .context("Failed to build symbol index")?;
    let map = AutoloadService::merge(&results);

    let json = serde_json::to_string_pretty(&map).context("Failed to serialize autoload map")?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write autoload map to {:?}", path))?;
            for result in &results {
                println!(
                    "{} {}: {} files, {} symbols{}",
                    if result.from_cache { "cached " } else { "scanned" },
                    result.index.root.display(),
                    result.index.file_count(),
                    result.index.symbol_count(),
                    if result.skipped.is_empty() {
                        String::new()
                    } else {
                        format!(", {} skipped", result.skipped.len())
                    }
                );
            }
            println!("✓ Wrote {} symbols to {}", map.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
