//! Status command implementation.
//!
//! Shows, per configured root, the current recursive mtime and the state of
//! its cache entry.

use anyhow::Result;
use std::path::Path;

use crate::indexing::AutoloadService;
use crate::Config;

pub fn run(dir: &Path, config: &Config) -> Result<()> {
    let service = AutoloadService::from_config(config, dir);

    println!("Project root: {}", service.project_root().display());
    println!("Initialized: {}", Config::is_initialized(dir));
    println!("Cache backend: {}", config.cache.backend);
    println!("Grace window: {}s", config.cache.grace_secs);
    println!("Extractor: {}", service.extractor_name());

    for root in &config.roots {
        println!();
        let status = match service.status(root) {
            Ok(status) => status,
            Err(e) => {
                println!("{}: {}", root.path.display(), e);
                continue;
            }
        };

        println!("Root: {}", status.root.path.display());
        println!("  Pattern: {}", status.root.pattern);
        println!("  Cache key: {} ({} backend)", status.key, status.backend);
        match status.observed_mtime {
            Some(mtime) => println!("  Recursive mtime: {}", mtime),
            None => println!("  Recursive mtime: unavailable (root unreadable)"),
        }

        match status.cached {
            Some(cached) => {
                println!(
                    "  Cached: {} files, {} symbols, mtime {}",
                    cached.files, cached.symbols, cached.mtime
                );
                println!("  Written: {}", cached.written_at.to_rfc3339());
                println!("  Fresh: {}", if cached.fresh { "yes" } else { "no (will rescan)" });
            }
            None => println!("  Cached: no"),
        }
    }

    Ok(())
}
