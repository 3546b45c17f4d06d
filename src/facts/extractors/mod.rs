//! Declaration extractors for different programming languages.
//!
//! Each extractor knows how to walk a language's syntax tree and collect the
//! top-level declarations that an autoloader can resolve: class-like types,
//! free functions, constants and type aliases.

pub mod go;
pub mod java;
pub mod python;
pub mod rust;
pub mod typescript;

use std::collections::HashMap;

use tree_sitter::{Node, Tree};

use super::{DeclaredType, FileFacts, Fingerprint};
use crate::indexer::Mtime;

pub use go::GoExtractor;
pub use java::JavaExtractor;
pub use python::PythonExtractor;
pub use rust::RustExtractor;
pub use typescript::TypeScriptExtractor;

/// Declarations collected from one syntax tree, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    pub types: Vec<DeclaredType>,
    pub functions: Vec<String>,
    pub constants: Vec<String>,
    pub type_aliases: Vec<String>,
}

impl Declarations {
    /// Attach file metadata to produce extractor output.
    pub fn into_facts(self, mtime: Mtime, fingerprint: Fingerprint) -> FileFacts {
        FileFacts {
            mtime,
            fingerprint,
            types: self.types,
            functions: self.functions,
            constants: self.constants,
            type_aliases: self.type_aliases,
        }
    }

    /// Names of all collected types.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
            && self.functions.is_empty()
            && self.constants.is_empty()
            && self.type_aliases.is_empty()
    }
}

/// Trait for language-specific declaration extractors.
pub trait DeclarationExtractor: Send + Sync {
    /// Get the language identifier string (e.g., "rust", "python").
    fn language_id(&self) -> &'static str;

    /// Collect declarations from a parsed tree.
    fn extract(&self, tree: &Tree, source: &[u8]) -> Declarations;
}

/// Registry of language-specific extractors.
pub struct ExtractorRegistry {
    extractors: HashMap<&'static str, Box<dyn DeclarationExtractor>>,
}

impl ExtractorRegistry {
    /// Create a registry with all built-in extractors.
    pub fn new() -> Self {
        let mut registry = Self {
            extractors: HashMap::new(),
        };

        registry.register(Box::new(RustExtractor));
        registry.register(Box::new(PythonExtractor));
        registry.register(Box::new(GoExtractor));
        registry.register(Box::new(JavaExtractor));
        registry.register(Box::new(TypeScriptExtractor::new("typescript")));
        registry.register(Box::new(TypeScriptExtractor::new("tsx")));
        registry.register(Box::new(TypeScriptExtractor::new("javascript")));

        registry
    }

    /// Get an extractor for a language.
    pub fn get(&self, language: &str) -> Option<&dyn DeclarationExtractor> {
        self.extractors.get(language).map(|e| e.as_ref())
    }

    /// Register a custom extractor, replacing any extractor for the same language.
    pub fn register(&mut self, extractor: Box<dyn DeclarationExtractor>) {
        self.extractors.insert(extractor.language_id(), extractor);
    }

    /// Get a list of supported languages.
    pub fn supported_languages(&self) -> Vec<&'static str> {
        self.extractors.keys().copied().collect()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper function to extract a node's text content.
pub fn node_text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.start_byte()..node.end_byte()]).unwrap_or("")
}

/// Text of the node stored under `field`, if present.
pub fn field_text(node: &Node, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .map(|n| node_text(&n, source).to_string())
        .filter(|text| !text.is_empty())
}

/// Texts of a node's named children, skipping the given kinds.
pub fn named_child_texts(node: &Node, source: &[u8], skip: &[&str]) -> Vec<String> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !skip.contains(&child.kind()))
        .map(|child| node_text(&child, source).to_string())
        .collect()
}
