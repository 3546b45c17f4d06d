//! Cache of one root's symbol index

use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{is_fresh, CacheBackend, CacheEntry, CacheError, CacheKey, CacheStore, INDEX_VERSION};
use crate::indexer::{Mtime, MtimeMemo, SourceRoot};
use crate::symbol::SymbolIndex;

/// [`CacheStore`] for the [`SymbolIndex`] of a single source root.
///
/// A cached index is fresh while the root's recursive mtime is no more than
/// `grace` seconds past the mtime recorded in the index. The recursive mtime
/// comes from a memo shared by every cache of one build.
pub struct IndexCache {
    backend: Arc<dyn CacheBackend>,
    key: CacheKey,
    root: PathBuf,
    grace: Mtime,
    memo: Arc<MtimeMemo>,
}

impl IndexCache {
    pub fn new(
        backend: Arc<dyn CacheBackend>,
        root: &SourceRoot,
        grace: Mtime,
        memo: Arc<MtimeMemo>,
    ) -> Self {
        Self {
            backend,
            key: CacheKey::for_root(root),
            root: root.path.clone(),
            grace,
            memo,
        }
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Read and decode the stored entry, including its metadata.
    pub fn entry(&self) -> Result<Option<CacheEntry<SymbolIndex>>, CacheError> {
        let Some(bytes) = self.backend.get(self.key.as_str())? else {
            return Ok(None);
        };
        let entry: CacheEntry<SymbolIndex> = serde_json::from_slice(&bytes)?;
        entry.check(&self.key)?;
        Ok(Some(entry))
    }

    fn encode(&self, index: &SymbolIndex) -> Result<Vec<u8>, CacheError> {
        let entry = CacheEntry {
            key: self.key.to_string(),
            format_version: INDEX_VERSION,
            written_at: Utc::now(),
            payload: index,
        };
        Ok(serde_json::to_vec(&entry)?)
    }
}

impl CacheStore<SymbolIndex> for IndexCache {
    fn fetch(&self) -> Option<SymbolIndex> {
        match self.entry() {
            Ok(Some(entry)) => Some(entry.payload),
            Ok(None) => {
                debug!("No cached index for {}", self.root.display());
                None
            }
            Err(e) => {
                warn!(
                    "Ignoring cached index for {} ({} backend): {}",
                    self.root.display(),
                    self.backend.name(),
                    e
                );
                None
            }
        }
    }

    fn validate(&self, index: &SymbolIndex) -> bool {
        let observed = match self.memo.get(&self.root) {
            Ok(mtime) => mtime,
            Err(e) => {
                warn!("Cannot validate cached index for {}: {}", self.root.display(), e);
                return false;
            }
        };

        let fresh = is_fresh(observed, index.mtime, self.grace);
        debug!(
            "Cached index for {}: observed mtime {}, cached {}, grace {} -> {}",
            self.root.display(),
            observed,
            index.mtime,
            self.grace,
            if fresh { "fresh" } else { "stale" }
        );
        fresh
    }

    fn set(&self, index: &SymbolIndex) -> Result<(), CacheError> {
        let bytes = self.encode(index)?;
        self.backend.set(self.key.as_str(), &bytes)
    }

    fn flush(&self) -> Result<(), CacheError> {
        debug!("Flushing cached index for {}", self.root.display());
        self.backend.delete(self.key.as_str())
    }
}
