//! Forward and reverse symbol index for a single source root

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::trace;

use super::{AutoloadMap, SymbolKind};
use crate::facts::{DeclaredType, FileFacts, Fingerprint};
use crate::indexer::Mtime;

/// Declarations of one file, with names already case-normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the project root
    pub relative_path: String,
    /// File modification time reported by the extractor
    pub mtime: Mtime,
    /// Content hash pair, carried but not acted upon
    pub fingerprint: Fingerprint,
    /// Declared classes, structs, traits, interfaces and enums
    pub types: Vec<DeclaredType>,
    /// Declared free functions
    pub functions: Vec<String>,
    /// Declared constants (exact case)
    pub constants: Vec<String>,
    /// Declared type aliases
    pub type_aliases: Vec<String>,
}

impl FileRecord {
    /// Build a record from extractor output, lower-casing class, function and
    /// type alias names.
    pub fn from_facts(relative_path: String, facts: FileFacts) -> Self {
        let types = facts
            .types
            .into_iter()
            .map(|declared| DeclaredType {
                name: SymbolKind::Class.normalize(&declared.name).into_owned(),
                ..declared
            })
            .collect();

        Self {
            relative_path,
            mtime: facts.mtime,
            fingerprint: facts.fingerprint,
            types,
            functions: normalize_all(SymbolKind::Function, facts.functions),
            constants: facts.constants,
            type_aliases: normalize_all(SymbolKind::Type, facts.type_aliases),
        }
    }

    /// Names this file declares for a given kind.
    pub fn names(&self, kind: SymbolKind) -> Vec<&str> {
        match kind {
            SymbolKind::Class => self.types.iter().map(|t| t.name.as_str()).collect(),
            SymbolKind::Function => self.functions.iter().map(String::as_str).collect(),
            SymbolKind::Type => self.type_aliases.iter().map(String::as_str).collect(),
            SymbolKind::Constant => self.constants.iter().map(String::as_str).collect(),
        }
    }

    /// Total number of declarations in this file.
    pub fn symbol_count(&self) -> usize {
        self.types.len() + self.functions.len() + self.constants.len() + self.type_aliases.len()
    }
}

fn normalize_all(kind: SymbolKind, names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| kind.normalize(&name).into_owned())
        .collect()
}

/// Index of one source root.
///
/// Every entry in the reverse map references a path that is a key of
/// `files`. An index is replaced wholesale on rebuild and never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolIndex {
    /// Recursive mtime of the root, taken after the scan that built this index
    pub mtime: Mtime,
    /// Root this index was built from
    pub root: PathBuf,
    /// Forward index: relative path → declarations
    pub files: HashMap<String, FileRecord>,
    /// Reverse index: kind → name → relative path
    pub map: AutoloadMap,
}

impl SymbolIndex {
    /// Create an empty index for a root.
    pub fn new(root: &Path) -> Self {
        Self {
            mtime: 0,
            root: root.to_path_buf(),
            files: HashMap::new(),
            map: AutoloadMap::new(),
        }
    }

    /// Add a file record and publish its declarations in the reverse index.
    ///
    /// A name already present for the same kind is overwritten, so the last
    /// file inserted wins on duplicate declarations.
    pub fn insert_file(&mut self, record: FileRecord) -> usize {
        let path = record.relative_path.clone();
        let mut published = 0;

        for kind in SymbolKind::ALL {
            for name in record.names(kind) {
                trace!("['{}']['{}'] = {}", kind, name, path);
                if let Some(previous) = self.map.insert(kind, name.to_string(), path.clone()) {
                    if previous != path {
                        trace!("{} '{}' moved from {} to {}", kind, name, previous, path);
                    }
                }
                published += 1;
            }
        }

        self.files.insert(path, record);
        published
    }

    /// Look up a file record by relative path.
    pub fn file(&self, relative_path: &str) -> Option<&FileRecord> {
        self.files.get(relative_path)
    }

    /// Number of indexed files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of reverse index entries.
    pub fn symbol_count(&self) -> usize {
        self.map.len()
    }

    /// The autoload map projection, without forward index detail.
    pub fn autoload_map(&self) -> &AutoloadMap {
        &self.map
    }

    /// Consume the index, keeping only the autoload map.
    pub fn into_autoload_map(self) -> AutoloadMap {
        self.map
    }

    /// Check that every reverse entry references an indexed file.
    pub fn is_consistent(&self) -> bool {
        self.map
            .iter()
            .all(|(_, _, path)| self.files.contains_key(path))
    }
}
