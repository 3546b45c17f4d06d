use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use defindex::cache::{CacheBackend, MemoryBackend};
use defindex::facts::{DeclaredType, FactExtractor, FileFacts, TypeFlags};
use defindex::{AutoloadService, SourceRoot};

/// Temporary project directory with a shared in-memory cache.
pub struct TestHarness {
    pub temp_dir: TempDir,
    pub backend: Arc<MemoryBackend>,
}

impl TestHarness {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            backend: Arc::new(MemoryBackend::new()),
        })
    }

    pub fn create_test_file(&self, path: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    pub fn create_dir(&self, path: &str) -> Result<PathBuf> {
        let dir = self.temp_dir.path().join(path);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A recursive root under the project matching `pattern`.
    pub fn root(&self, path: &str, pattern: &str) -> SourceRoot {
        SourceRoot::new(path, pattern)
    }

    /// Service rooted at the harness directory, sharing its cache.
    pub fn service(&self, extractor: Arc<dyn FactExtractor>) -> AutoloadService {
        let backend: Arc<dyn CacheBackend> = self.backend.clone();
        AutoloadService::new(self.path(), backend, extractor)
    }
}

/// Facts declaring the given classes, functions and constants.
pub fn facts(classes: &[&str], functions: &[&str], constants: &[&str]) -> FileFacts {
    FileFacts {
        mtime: 1,
        types: classes
            .iter()
            .map(|name| DeclaredType::new(*name, TypeFlags::CLASS))
            .collect(),
        functions: functions.iter().map(|s| s.to_string()).collect(),
        constants: constants.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}
