//! Parallel fact extraction backed by tree-sitter grammars

use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::extractors::ExtractorRegistry;
use super::parser_pool::ParserPool;
use super::{FactExtractor, FileFacts, Fingerprint};
use crate::indexer::mtime::file_mtime;

/// Fact extractor that parses files with tree-sitter.
///
/// Files are processed on a dedicated rayon pool; each worker owns a
/// [`ParserPool`] so parsers are never shared across threads.
pub struct TreeSitterExtractor {
    registry: Arc<ExtractorRegistry>,
    threads: usize,
}

impl TreeSitterExtractor {
    /// Create an extractor using one worker per CPU.
    pub fn new() -> Self {
        Self::with_threads(None)
    }

    /// Create an extractor with an explicit worker count.
    pub fn with_threads(threads: Option<usize>) -> Self {
        let threads = threads.filter(|n| *n > 0).unwrap_or_else(num_cpus::get);
        Self {
            registry: Arc::new(ExtractorRegistry::new()),
            threads,
        }
    }

    /// Number of worker threads used per batch.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Whether a file would be handled by one of the registered languages.
    pub fn supports(&self, path: &Path) -> bool {
        ParserPool::detect_language(path)
            .map(|language| self.registry.get(language).is_some())
            .unwrap_or(false)
    }

    fn extract_one(&self, pool: &mut ParserPool, path: &Path) -> Option<FileFacts> {
        let language = match ParserPool::detect_language(path) {
            Some(language) => language,
            None => {
                debug!("No grammar for {}", path.display());
                return None;
            }
        };

        let extractor = self.registry.get(language)?;

        let source = match fs::read(path) {
            Ok(source) => source,
            Err(e) => {
                debug!("Failed to read {}: {}", path.display(), e);
                return None;
            }
        };

        let mtime = match file_mtime(path) {
            Ok(mtime) => mtime,
            Err(e) => {
                debug!("Failed to stat {}: {}", path.display(), e);
                return None;
            }
        };

        let parser = pool.get_parser(language)?;
        let tree = match parser.parse(&source, None) {
            Some(tree) => tree,
            None => {
                debug!("Failed to parse {} as {}", path.display(), language);
                return None;
            }
        };

        let declarations = extractor.extract(&tree, &source);
        debug!(
            "{}: {} types, {} functions, {} constants, {} type aliases",
            path.display(),
            declarations.types.len(),
            declarations.functions.len(),
            declarations.constants.len(),
            declarations.type_aliases.len()
        );

        Some(declarations.into_facts(mtime, Fingerprint::of(&source)))
    }

    fn extract_sequential(&self, paths: &[PathBuf]) -> HashMap<PathBuf, Option<FileFacts>> {
        let mut pool = ParserPool::new();
        paths
            .iter()
            .map(|path| (path.clone(), self.extract_one(&mut pool, path)))
            .collect()
    }
}

impl Default for TreeSitterExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FactExtractor for TreeSitterExtractor {
    fn extract(&self, paths: &[PathBuf]) -> HashMap<PathBuf, Option<FileFacts>> {
        info!(
            "Extracting declarations from {} files on {} threads",
            paths.len(),
            self.threads
        );

        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                warn!("Failed to build extraction thread pool, running sequentially: {}", e);
                return self.extract_sequential(paths);
            }
        };

        pool.install(|| {
            paths
                .par_iter()
                .map_init(ParserPool::new, |parsers, path| {
                    (path.clone(), self.extract_one(parsers, path))
                })
                .collect()
        })
    }

    fn name(&self) -> &'static str {
        "tree-sitter"
    }
}
