use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{is_state_dir, SourceRoot};
use crate::indexing::IndexError;

/// Enumerates the files of a source root whose full path matches the root's
/// pattern.
///
/// Symlinked directories are followed. Hidden files are not filtered and
/// the pattern alone decides what is a candidate, except for the
/// `.defindex` state directory, which is never descended into.
pub struct DirectoryScanner {
    root: PathBuf,
    pattern: Regex,
}

impl DirectoryScanner {
    /// Create a scanner for a source root.
    ///
    /// Fails with `UnsupportedConfiguration` for non-recursive roots and with
    /// `InvalidPattern` when the pattern does not compile.
    pub fn new(root: &SourceRoot) -> Result<Self, IndexError> {
        if !root.recursive {
            return Err(IndexError::UnsupportedConfiguration(format!(
                "non-recursive scanning of {} is not implemented",
                root.path.display()
            )));
        }

        let pattern = Regex::new(&root.pattern).map_err(|source| IndexError::InvalidPattern {
            pattern: root.pattern.clone(),
            source,
        })?;

        Ok(Self {
            root: root.path.clone(),
            pattern,
        })
    }

    /// Whether a path would be selected by this scanner's pattern.
    pub fn matches(&self, path: &Path) -> bool {
        self.pattern.is_match(&path.to_string_lossy())
    }

    /// Walk the root and collect every matching file, in enumeration order.
    ///
    /// An unreadable root is an error. Errors below the root (permission
    /// problems, symlink loops, dangling links) skip that entry.
    pub fn scan(&self) -> Result<Vec<PathBuf>, IndexError> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| !is_state_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(IndexError::walk(&self.root, e)),
                Err(e) => {
                    warn!("Skipping entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        debug!(
            "Scanned {}: {} files match '{}'",
            self.root.display(),
            files.len(),
            self.pattern.as_str()
        );
        Ok(files)
    }
}
