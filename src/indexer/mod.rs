//! Filesystem side of indexing: source roots, directory scanning and
//! recursive modification times.

pub mod mtime;
pub mod walker;

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub use mtime::{recursive_mtime, Mtime, MtimeMemo};
pub use walker::DirectoryScanner;

use walkdir::DirEntry;

use crate::config::CONFIG_DIR;

/// Default file pattern for a source root.
pub const DEFAULT_PATTERN: &str = r"\.rs$";

/// A directory tree to index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRoot {
    /// Root directory; relative paths are resolved against the project root
    pub path: PathBuf,

    /// Regular expression matched against each file's full path
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Descend into subdirectories. Only recursive scanning is supported.
    #[serde(default = "default_recursive")]
    pub recursive: bool,
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

fn default_recursive() -> bool {
    true
}

impl SourceRoot {
    /// A recursive root with the given pattern.
    pub fn new(path: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            pattern: pattern.into(),
            recursive: true,
        }
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Resolve the root path against `base` and make it absolute and
    /// normalized.
    pub fn resolve(&self, base: &Path) -> std::io::Result<Self> {
        let joined = if self.path.is_absolute() {
            self.path.clone()
        } else {
            base.join(&self.path)
        };
        Ok(Self {
            path: absolute_path(&joined)?,
            ..self.clone()
        })
    }
}

/// Whether a walk entry is the tool's own state directory, which holds
/// rotating log files and is never part of a source tree.
pub(crate) fn is_state_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == CONFIG_DIR
}

/// Make `path` absolute against the current directory and fold away `.`
/// and `..` components.
///
/// Scanned files and the project root both go through this, so stripping
/// the project root from a file path works on matching components.
pub fn absolute_path(path: &Path) -> std::io::Result<PathBuf> {
    Ok(normalize_path(&std::path::absolute(path)?))
}

/// Lexically remove `.` components and resolve `..` against the preceding
/// component. Symlinks are not consulted; `..` never climbs above the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(Component::ParentDir),
            },
            other => normalized.push(other),
        }
    }
    normalized
}
