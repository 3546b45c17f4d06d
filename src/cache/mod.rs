//! Freshness-validated persistence for symbol indexes.
//!
//! A [`CacheStore`] holds one typed payload under a fixed key and decides on
//! read whether the payload is still fresh. Bytes go through a
//! [`CacheBackend`]; every backend failure degrades to a cache miss.

pub mod file;
pub mod index_cache;
pub mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{CacheBackendKind, CacheConfig};
use crate::indexer::{Mtime, SourceRoot};

pub use file::FileBackend;
pub use index_cache::IndexCache;
pub use memory::MemoryBackend;

/// Version of the cached payload layout. Bumping it invalidates every
/// existing entry because the version is part of the key.
pub const INDEX_VERSION: u32 = 2;

/// Default tolerance, in seconds, between a root's observed mtime and the
/// mtime recorded in its cached index.
pub const DEFAULT_GRACE_SECS: Mtime = 5;

const KEY_PREFIX: &str = "tree_cache:/";

/// Errors from cache backends and entry decoding.
///
/// These never abort a build; callers log them and treat the entry as absent.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Backend(String),

    #[error("Cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache entry encoding error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache entry key mismatch: expected '{expected}', found '{found}'")]
    KeyMismatch { expected: String, found: String },

    #[error("Cache entry version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Deterministic cache key for a source root.
///
/// Built from the format version, root path, file pattern and recursion
/// flag, so changing any scan parameter addresses a different entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_root(root: &SourceRoot) -> Self {
        Self(format!(
            "{}{}:{}:{}:{}",
            KEY_PREFIX,
            INDEX_VERSION,
            root.path.display(),
            root.pattern,
            root.recursive as u8
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted form of a cached payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<P> {
    pub key: String,
    pub format_version: u32,
    pub written_at: DateTime<Utc>,
    pub payload: P,
}

impl<P> CacheEntry<P> {
    /// Reject entries written under another key or format version.
    pub fn check(&self, key: &CacheKey) -> Result<(), CacheError> {
        if self.key != key.as_str() {
            return Err(CacheError::KeyMismatch {
                expected: key.to_string(),
                found: self.key.clone(),
            });
        }
        if self.format_version != INDEX_VERSION {
            return Err(CacheError::VersionMismatch {
                expected: INDEX_VERSION,
                found: self.format_version,
            });
        }
        Ok(())
    }
}

/// Freshness rule: a cached payload stamped `cached` is valid while the
/// observed mtime is at most `grace` units newer.
///
/// The grace window absorbs clock skew between hosts sharing a cache. It is
/// not a correctness guarantee: edits landing within the window after a
/// build go unnoticed until the tree changes again.
pub fn is_fresh(observed: Mtime, cached: Mtime, grace: Mtime) -> bool {
    observed <= cached.saturating_add(grace)
}

/// Raw byte storage addressed by opaque string keys.
pub trait CacheBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store bytes, replacing any existing value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Remove a key. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    fn name(&self) -> &'static str;
}

/// Typed cache over a single payload with freshness validation.
pub trait CacheStore<P> {
    /// Read the stored payload without validating it.
    fn fetch(&self) -> Option<P>;

    /// Whether a payload is still fresh.
    fn validate(&self, payload: &P) -> bool;

    /// The stored payload, if present and fresh.
    fn get(&self) -> Option<P> {
        self.fetch().filter(|payload| self.validate(payload))
    }

    /// Persist a payload, overwriting any existing entry.
    fn set(&self, payload: &P) -> Result<(), CacheError>;

    /// Delete the entry.
    fn flush(&self) -> Result<(), CacheError>;
}

/// Backend that stores nothing; every read is a miss.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledBackend;

impl CacheBackend for DisabledBackend {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &[u8]) -> Result<(), CacheError> {
        Ok(())
    }

    fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Open the backend selected in configuration.
///
/// A file backend without a usable directory falls back to the disabled
/// backend, so builds still run (uncached).
pub fn open_backend(config: &CacheConfig) -> Arc<dyn CacheBackend> {
    match config.backend {
        CacheBackendKind::Memory => Arc::new(MemoryBackend::new()),
        CacheBackendKind::Disabled => Arc::new(DisabledBackend),
        CacheBackendKind::File => {
            let directory = match &config.directory {
                Some(directory) => Ok(directory.clone()),
                None => FileBackend::default_directory(),
            };
            match directory {
                Ok(directory) => {
                    let backend = FileBackend::new(directory);
                    debug!("File cache at {}", backend.directory().display());
                    Arc::new(backend)
                }
                Err(e) => {
                    warn!("File cache unavailable, caching disabled: {}", e);
                    Arc::new(DisabledBackend)
                }
            }
        }
    }
}
