//! Error types for index building

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::cache::CacheError;

/// Errors that abort the build of a root.
///
/// Extraction failures and cache degradation during a build are not
/// represented here: the former drop a single file, the latter turn into a
/// cache miss.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The root or a directory below it could not be read.
    #[error("Filesystem error at {path}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configured root does not exist or is not a directory.
    #[error("Source root not found: {0}")]
    RootNotFound(PathBuf),

    /// The root asks for a mode that is not implemented.
    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// The file pattern is not a valid regular expression.
    #[error("Invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// An explicit cache operation (flush) failed.
    #[error("Cache operation failed: {0}")]
    Cache(#[from] CacheError),
}

impl IndexError {
    /// Wrap an I/O error with the path it occurred at.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Convert a directory walk error, keeping the failing path when known.
    pub fn walk(root: &std::path::Path, err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| root.to_path_buf());
        let message = err.to_string();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
        Self::FileSystem { path, source }
    }

    /// Whether this error came from the filesystem.
    pub fn is_filesystem(&self) -> bool {
        matches!(self, Self::FileSystem { .. } | Self::RootNotFound(_))
    }
}
