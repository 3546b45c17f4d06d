//! Recursive modification time of a directory tree

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{trace, warn};
use walkdir::WalkDir;

use super::is_state_dir;
use crate::indexing::IndexError;

/// Modification time in whole seconds since the Unix epoch.
pub type Mtime = i64;

/// Convert a filesystem timestamp to [`Mtime`]. Times before the epoch are
/// negative.
pub fn to_mtime(time: SystemTime) -> Mtime {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as Mtime,
        Err(before) => -(before.duration().as_secs() as Mtime),
    }
}

/// Modification time of a single path, following symlinks.
pub fn file_mtime(path: &Path) -> io::Result<Mtime> {
    Ok(to_mtime(fs::metadata(path)?.modified()?))
}

/// Most recent modification time of `root` and every directory below it.
///
/// Symlinked directories are followed and `.defindex` state directories
/// are skipped. Only directory mtimes count: adding,
/// removing or renaming a file bumps its parent directory, which is what the
/// cache freshness check needs to notice. An unreadable root is an error;
/// unreadable subdirectories and symlink loops are logged and skipped.
pub fn recursive_mtime(root: &Path) -> Result<Mtime, IndexError> {
    let mut latest = Mtime::MIN;

    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_state_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(IndexError::walk(root, e)),
            Err(e) => {
                if let Some(ancestor) = e.loop_ancestor() {
                    warn!("Symlink loop back to {} skipped", ancestor.display());
                } else {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                }
                continue;
            }
        };

        if entry.depth() > 0 && !entry.file_type().is_dir() {
            continue;
        }

        let modified = entry
            .metadata()
            .map_err(|e| IndexError::walk(root, e))
            .and_then(|meta| {
                meta.modified()
                    .map_err(|e| IndexError::io(entry.path(), e))
            });

        match modified {
            Ok(time) => latest = latest.max(to_mtime(time)),
            Err(e) if entry.depth() == 0 => return Err(e),
            Err(e) => warn!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    trace!("recursive mtime of {} = {}", root.display(), latest);
    Ok(latest)
}

/// Recursive mtimes memoized for the duration of one build invocation.
///
/// Create one per build and drop it afterwards; entries are never expired,
/// so a long-lived memo would report stale times.
#[derive(Debug, Default)]
pub struct MtimeMemo {
    entries: Mutex<HashMap<PathBuf, Mtime>>,
}

impl MtimeMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized recursive mtime of `root`, computed on first request.
    pub fn get(&self, root: &Path) -> Result<Mtime, IndexError> {
        if let Some(mtime) = self.cached(root) {
            return Ok(mtime);
        }
        self.refresh(root)
    }

    /// Recompute the recursive mtime of `root` and replace the memo entry.
    pub fn refresh(&self, root: &Path) -> Result<Mtime, IndexError> {
        let mtime = recursive_mtime(root)?;
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(root.to_path_buf(), mtime);
        Ok(mtime)
    }

    /// The memoized value, if one was computed.
    pub fn cached(&self, root: &Path) -> Option<Mtime> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(root)
            .copied()
    }
}
