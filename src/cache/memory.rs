//! In-process cache backend

use std::collections::HashMap;
use std::sync::RwLock;

use super::{CacheBackend, CacheError};

/// Cache backend holding entries in a process-local map.
///
/// Entries live as long as the backend; useful for one-shot builds that
/// still want cache hits across roots, and for tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let backend = MemoryBackend::new();
        assert!(backend.is_empty());
        assert!(backend.get("a").unwrap().is_none());

        backend.set("a", b"first").unwrap();
        backend.set("a", b"second").unwrap();
        assert_eq!(backend.get("a").unwrap().as_deref(), Some(&b"second"[..]));
        assert_eq!(backend.len(), 1);

        backend.delete("a").unwrap();
        backend.delete("a").unwrap();
        assert!(backend.get("a").unwrap().is_none());
    }
}
