//! In-memory fact extractor for tests and callers that already hold facts

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{FactExtractor, FileFacts};

/// Extractor that answers from a fixed table keyed by path.
///
/// Paths registered with `None`, and paths never registered, come back as
/// `None` (extraction failure).
#[derive(Debug, Default)]
pub struct StaticExtractor {
    facts: HashMap<PathBuf, Option<FileFacts>>,
    calls: AtomicUsize,
}

impl StaticExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register facts for a path.
    pub fn with_file(mut self, path: impl Into<PathBuf>, facts: FileFacts) -> Self {
        self.facts.insert(path.into(), Some(facts));
        self
    }

    /// Register a path whose extraction fails.
    pub fn with_failure(mut self, path: impl Into<PathBuf>) -> Self {
        self.facts.insert(path.into(), None);
        self
    }

    /// Number of batched `extract` calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl FactExtractor for StaticExtractor {
    fn extract(&self, paths: &[PathBuf]) -> HashMap<PathBuf, Option<FileFacts>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        paths
            .iter()
            .map(|path| (path.clone(), self.facts.get(path).cloned().flatten()))
            .collect()
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
