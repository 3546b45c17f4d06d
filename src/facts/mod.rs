//! Source fact extraction.
//!
//! A fact extractor receives the full list of candidate files in one batched
//! call and reports, per file, the declarations it found. A `None` entry means
//! extraction failed for that file; the builder drops such files without
//! failing the build.

pub mod extractors;
pub mod parser_pool;
pub mod static_facts;
pub mod syntax;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::indexer::Mtime;

pub use extractors::{DeclarationExtractor, Declarations, ExtractorRegistry};
pub use parser_pool::ParserPool;
pub use static_facts::StaticExtractor;
pub use syntax::TreeSitterExtractor;

/// Content hash of a file as two 64-bit words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub u64, pub u64);

impl Fingerprint {
    /// Fingerprint file content using the first 16 bytes of its SHA-256 digest.
    pub fn of(content: &[u8]) -> Self {
        let digest = Sha256::digest(content);
        let mut hi = [0u8; 8];
        let mut lo = [0u8; 8];
        hi.copy_from_slice(&digest[0..8]);
        lo.copy_from_slice(&digest[8..16]);
        Self(u64::from_le_bytes(hi), u64::from_le_bytes(lo))
    }
}

bitflags! {
    /// What sort of type declaration a [`DeclaredType`] is.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TypeFlags: u32 {
        const CLASS = 1 << 0;
        const INTERFACE = 1 << 1;
        const TRAIT = 1 << 2;
        const ENUM = 1 << 3;
        const STRUCT = 1 << 4;
        const RECORD = 1 << 5;
        const UNION = 1 << 6;
        const ABSTRACT = 1 << 7;
        const FINAL = 1 << 8;
    }
}

/// A class-like declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredType {
    pub name: String,
    pub flags: TypeFlags,
    /// Names of extended classes, implemented interfaces or supertraits
    pub base_types: Vec<String>,
}

impl DeclaredType {
    /// Create a type declaration without base types.
    pub fn new(name: impl Into<String>, flags: TypeFlags) -> Self {
        Self {
            name: name.into(),
            flags,
            base_types: Vec::new(),
        }
    }

    /// Attach base type names.
    pub fn with_bases(mut self, bases: Vec<String>) -> Self {
        self.base_types = bases;
        self
    }
}

/// Declaration metadata for one file, as reported by an extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFacts {
    pub mtime: Mtime,
    pub fingerprint: Fingerprint,
    pub types: Vec<DeclaredType>,
    pub functions: Vec<String>,
    pub constants: Vec<String>,
    pub type_aliases: Vec<String>,
}

/// Batched declaration extractor.
///
/// Implementations may parallelize internally but must return a complete
/// result set; every requested path should have an entry, and a missing
/// entry is treated the same as `None`.
pub trait FactExtractor: Send + Sync {
    /// Extract declarations from every file in `paths`.
    fn extract(&self, paths: &[PathBuf]) -> HashMap<PathBuf, Option<FileFacts>>;

    /// Extractor name for logging.
    fn name(&self) -> &'static str;
}
