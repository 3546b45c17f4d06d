//! Multi-root builds merged into one autoload map

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::builder::{BuildResult, SymbolIndexBuilder};
use super::errors::IndexError;
use crate::cache::{self, is_fresh, CacheBackend, CacheKey, CacheStore, IndexCache};
use crate::config::Config;
use crate::facts::{FactExtractor, TreeSitterExtractor};
use crate::indexer::{absolute_path, Mtime, MtimeMemo, SourceRoot};
use crate::symbol::{merge_maps, AutoloadMap};

/// Cache state of one root, for status reporting.
#[derive(Debug, Clone)]
pub struct RootStatus {
    pub root: SourceRoot,
    pub key: CacheKey,
    /// Name of the backend actually in use
    pub backend: &'static str,
    /// Current recursive mtime, or `None` when the root is unreadable
    pub observed_mtime: Option<Mtime>,
    pub cached: Option<CachedSummary>,
}

#[derive(Debug, Clone)]
pub struct CachedSummary {
    pub mtime: Mtime,
    pub written_at: DateTime<Utc>,
    pub files: usize,
    pub symbols: usize,
    pub fresh: bool,
}

/// Builds and merges the indexes of several source roots.
///
/// Each call to [`AutoloadService::build`] uses its own mtime memo, so
/// repeated builds in a long-running process always see the current tree.
pub struct AutoloadService {
    base_dir: PathBuf,
    project_root: PathBuf,
    backend: Arc<dyn CacheBackend>,
    extractor: Arc<dyn FactExtractor>,
    grace: Mtime,
}

impl AutoloadService {
    /// Create a service publishing paths relative to `project_root`.
    ///
    /// A relative project root is taken relative to the current directory;
    /// `.` and `..` components are folded away.
    pub fn new(
        project_root: impl Into<PathBuf>,
        backend: Arc<dyn CacheBackend>,
        extractor: Arc<dyn FactExtractor>,
    ) -> Self {
        let project_root = normalized_or_raw(project_root.into());
        Self {
            base_dir: project_root.clone(),
            project_root,
            backend,
            extractor,
            grace: cache::DEFAULT_GRACE_SECS,
        }
    }

    /// Service configured from `<config_dir>/.defindex/config.toml` values.
    ///
    /// Relative roots resolve against `config_dir`.
    pub fn from_config(config: &Config, config_dir: &Path) -> Self {
        let extractor = TreeSitterExtractor::with_threads(config.extractor.parallel_threads);
        Self::new(
            config.project_root(config_dir),
            cache::open_backend(&config.cache),
            Arc::new(extractor),
        )
        .with_base_dir(config_dir)
        .with_grace(config.cache.grace_secs)
    }

    /// Directory that relative root paths are resolved against.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = normalized_or_raw(base_dir.into());
        self
    }

    pub fn with_grace(mut self, grace: Mtime) -> Self {
        self.grace = grace;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn extractor_name(&self) -> &'static str {
        self.extractor.name()
    }

    /// Build every root in priority order and merge their maps; later roots
    /// win on name collisions.
    ///
    /// With `flush_first`, each root's cache entry is dropped before its
    /// build, forcing a rescan. The first failing root aborts the whole
    /// build.
    pub fn build(&self, roots: &[SourceRoot], flush_first: bool) -> Result<AutoloadMap, IndexError> {
        let results = self.build_indexes(roots, flush_first)?;
        Ok(Self::merge(&results))
    }

    /// Build every root, returning the per-root results in priority order.
    pub fn build_indexes(
        &self,
        roots: &[SourceRoot],
        flush_first: bool,
    ) -> Result<Vec<BuildResult>, IndexError> {
        let memo = Arc::new(MtimeMemo::new());
        let mut results = Vec::with_capacity(roots.len());

        for root in roots {
            results.push(self.build_root(root, &memo, flush_first)?);
        }

        let cached = results.iter().filter(|r| r.from_cache).count();
        info!(
            "Built {} roots ({} from cache, {} rescanned)",
            results.len(),
            cached,
            results.len() - cached
        );
        Ok(results)
    }

    /// Merge per-root results in order.
    pub fn merge(results: &[BuildResult]) -> AutoloadMap {
        results.iter().fold(AutoloadMap::new(), |merged, result| {
            merge_maps(merged, result.index.autoload_map())
        })
    }

    /// Build a single root using a caller-provided memo.
    pub fn build_root(
        &self,
        root: &SourceRoot,
        memo: &Arc<MtimeMemo>,
        flush_first: bool,
    ) -> Result<BuildResult, IndexError> {
        let root = self.resolve_root(root)?;
        if !root.path.is_dir() {
            return Err(IndexError::RootNotFound(root.path));
        }

        let cache = self.cache_for(&root, memo.clone());
        if flush_first {
            if let Err(e) = cache.flush() {
                warn!("Failed to flush cache for {}: {}", root.path.display(), e);
            }
        }

        let builder = SymbolIndexBuilder::new(root, &self.project_root, memo.clone())?;
        builder.build(self.extractor.as_ref(), &cache)
    }

    /// Delete the cache entry of a root.
    pub fn flush_root(&self, root: &SourceRoot) -> Result<(), IndexError> {
        let root = self.resolve_root(root)?;
        let cache = self.cache_for(&root, Arc::new(MtimeMemo::new()));
        cache.flush()?;
        debug!("Flushed {}", cache.key());
        Ok(())
    }

    /// Inspect a root's cache entry without building anything.
    pub fn status(&self, root: &SourceRoot) -> Result<RootStatus, IndexError> {
        let root = self.resolve_root(root)?;
        let memo = Arc::new(MtimeMemo::new());
        let cache = self.cache_for(&root, memo.clone());
        let observed_mtime = memo.get(&root.path).ok();

        let cached = match cache.entry() {
            Ok(entry) => entry.map(|entry| CachedSummary {
                mtime: entry.payload.mtime,
                written_at: entry.written_at,
                files: entry.payload.file_count(),
                symbols: entry.payload.symbol_count(),
                fresh: observed_mtime
                    .map(|observed| is_fresh(observed, entry.payload.mtime, self.grace))
                    .unwrap_or(false),
            }),
            Err(e) => {
                warn!("Unreadable cache entry for {}: {}", root.path.display(), e);
                None
            }
        };

        Ok(RootStatus {
            key: cache.key().clone(),
            backend: cache.backend_name(),
            root,
            observed_mtime,
            cached,
        })
    }

    /// Make a root's path absolute against the service's base directory.
    pub fn resolve_root(&self, root: &SourceRoot) -> Result<SourceRoot, IndexError> {
        root.resolve(&self.base_dir)
            .map_err(|e| IndexError::io(&root.path, e))
    }

    fn cache_for(&self, root: &SourceRoot, memo: Arc<MtimeMemo>) -> IndexCache {
        IndexCache::new(self.backend.clone(), root, self.grace, memo)
    }
}

fn normalized_or_raw(path: PathBuf) -> PathBuf {
    match absolute_path(&path) {
        Ok(absolute) => absolute,
        Err(e) => {
            warn!("Cannot make {} absolute, using it as given: {}", path.display(), e);
            path
        }
    }
}
