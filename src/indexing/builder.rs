//! Builds the symbol index of one source root, preferring the cache

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::errors::IndexError;
use crate::cache::CacheStore;
use crate::facts::FactExtractor;
use crate::indexer::{absolute_path, DirectoryScanner, MtimeMemo, SourceRoot};
use crate::symbol::{FileRecord, SymbolIndex};

/// Outcome of building one root.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub index: SymbolIndex,
    /// The index came from the cache and no scan happened
    pub from_cache: bool,
    /// Files matched by the scanner (0 on a cache hit)
    pub files_scanned: usize,
    /// Files the extractor returned no facts for
    pub skipped: Vec<PathBuf>,
    pub duration: Duration,
}

/// Produces the [`SymbolIndex`] for exactly one source root.
pub struct SymbolIndexBuilder {
    root: SourceRoot,
    scanner: DirectoryScanner,
    project_root: PathBuf,
    memo: Arc<MtimeMemo>,
}

impl SymbolIndexBuilder {
    /// Create a builder for `root`, publishing paths relative to
    /// `project_root`.
    ///
    /// Both paths are made absolute and normalized so that scanned files
    /// share their leading components with the project root. Fails
    /// immediately for non-recursive roots and invalid patterns.
    pub fn new(
        root: SourceRoot,
        project_root: impl Into<PathBuf>,
        memo: Arc<MtimeMemo>,
    ) -> Result<Self, IndexError> {
        let project_root = project_root.into();
        let project_root =
            absolute_path(&project_root).map_err(|e| IndexError::io(&project_root, e))?;
        let root = SourceRoot {
            path: absolute_path(&root.path).map_err(|e| IndexError::io(&root.path, e))?,
            ..root
        };
        let scanner = DirectoryScanner::new(&root)?;
        Ok(Self {
            root,
            scanner,
            project_root,
            memo,
        })
    }

    /// The root being indexed, with its path absolute and normalized.
    pub fn root(&self) -> &SourceRoot {
        &self.root
    }

    /// Return the cached index when it is fresh; otherwise rescan the root,
    /// extract facts in one batch and write the new index through to the
    /// cache.
    pub fn build(
        &self,
        extractor: &dyn FactExtractor,
        cache: &dyn CacheStore<SymbolIndex>,
    ) -> Result<BuildResult, IndexError> {
        let start = Instant::now();

        if let Some(index) = cache.get() {
            info!(
                "Using cached index for {} ({} files, {} symbols)",
                self.root.path.display(),
                index.file_count(),
                index.symbol_count()
            );
            return Ok(BuildResult {
                index,
                from_cache: true,
                files_scanned: 0,
                skipped: Vec::new(),
                duration: start.elapsed(),
            });
        }

        let (index, files_scanned, skipped) = self.rescan(extractor)?;

        if let Err(e) = cache.set(&index) {
            warn!("Failed to cache index for {}: {}", self.root.path.display(), e);
        }

        let duration = start.elapsed();
        info!(
            "Indexed {}: {} files, {} symbols, {} skipped in {:.2}s",
            self.root.path.display(),
            index.file_count(),
            index.symbol_count(),
            skipped.len(),
            duration.as_secs_f64()
        );

        Ok(BuildResult {
            index,
            from_cache: false,
            files_scanned,
            skipped,
            duration,
        })
    }

    /// Full rescan without consulting or updating any cache.
    ///
    /// Returns the index, the number of scanned files and the files the
    /// extractor had no facts for.
    pub fn rescan(
        &self,
        extractor: &dyn FactExtractor,
    ) -> Result<(SymbolIndex, usize, Vec<PathBuf>), IndexError> {
        let files = self.scanner.scan()?;
        debug!(
            "Extracting {} files from {} with {}",
            files.len(),
            self.root.path.display(),
            extractor.name()
        );

        let mut facts = extractor.extract(&files);
        let mut index = SymbolIndex::new(&self.root.path);
        let mut skipped = Vec::new();

        for path in &files {
            match facts.remove(path).flatten() {
                Some(file_facts) => {
                    let record = FileRecord::from_facts(self.relative_path(path), file_facts);
                    index.insert_file(record);
                }
                None => {
                    debug!("No facts for {}, leaving it out of the index", path.display());
                    skipped.push(path.clone());
                }
            }
        }

        index.mtime = self.memo.refresh(&self.root.path)?;

        Ok((index, files.len(), skipped))
    }

    /// Path of `file` relative to the project root, without leading
    /// separators. Files outside the project root keep their full path
    /// minus the leading separator.
    pub fn relative_path(&self, file: &Path) -> String {
        let relative = match file.strip_prefix(&self.project_root) {
            Ok(stripped) => stripped.to_string_lossy(),
            Err(_) => file.to_string_lossy(),
        };
        relative.trim_start_matches(['/', '\\']).to_string()
    }
}
