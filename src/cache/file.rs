//! On-disk cache backend: one JSON file per key

use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{CacheBackend, CacheError};

const APP_QUALIFIER: &str = "dev";
const APP_ORGANIZATION: &str = "defindex";
const APP_NAME: &str = "defindex";

/// Cache backend storing each entry in `<directory>/<hash-of-key>.json`.
///
/// Writes go to a temporary file that is renamed over the target, so a
/// reader sees either the previous entry or the new one, never a partial
/// write. Concurrent writers race and the last rename wins.
#[derive(Debug, Clone)]
pub struct FileBackend {
    directory: PathBuf,
}

impl FileBackend {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Platform data directory for shared caches
    /// (e.g. `~/.local/share/defindex/caches`).
    pub fn default_directory() -> Result<PathBuf, CacheError> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("caches"))
            .ok_or_else(|| CacheError::Backend("Could not determine home directory".to_string()))
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File holding the entry for `key`.
    ///
    /// Keys contain path separators and regex syntax, so the file name is a
    /// digest of the key rather than the key itself.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        let name: String = digest[..12].iter().map(|b| format!("{:02x}", b)).collect();
        self.directory.join(format!("{}.json", name))
    }

    fn io_error(path: &Path, source: std::io::Error) -> CacheError {
        CacheError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl CacheBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        fs::create_dir_all(&self.directory).map_err(|e| Self::io_error(&self.directory, e))?;

        let path = self.entry_path(key);
        let temp_path = path.with_extension(format!("json.{}.tmp", std::process::id()));

        let mut file = fs::File::create(&temp_path).map_err(|e| Self::io_error(&temp_path, e))?;
        file.write_all(value)
            .map_err(|e| Self::io_error(&temp_path, e))?;
        file.sync_all().map_err(|e| Self::io_error(&temp_path, e))?;

        fs::rename(&temp_path, &path).map_err(|e| Self::io_error(&path, e))?;

        debug!("Wrote cache entry {} to {}", key, path.display());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed cache entry {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
