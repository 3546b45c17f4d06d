//! Per-worker pool of tree-sitter parsers.
//!
//! Provides parser management with language detection and grammar initialization.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;
use tree_sitter::{Language, Parser};

/// Manages tree-sitter parsers for multiple languages.
///
/// Each language gets its own parser instance, created on first use and
/// reused for every later file of that language. A pool is not shared across
/// threads; the extractor builds one per rayon worker.
pub struct ParserPool {
    parsers: HashMap<&'static str, Parser>,
    languages: HashMap<&'static str, Language>,
}

impl ParserPool {
    /// Create a new parser pool with all supported languages.
    pub fn new() -> Self {
        let mut pool = Self {
            parsers: HashMap::new(),
            languages: HashMap::new(),
        };

        pool.register_language("rust", tree_sitter_rust::LANGUAGE.into());
        pool.register_language("python", tree_sitter_python::LANGUAGE.into());
        pool.register_language("javascript", tree_sitter_javascript::LANGUAGE.into());
        pool.register_language("typescript", tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into());
        pool.register_language("tsx", tree_sitter_typescript::LANGUAGE_TSX.into());
        pool.register_language("go", tree_sitter_go::LANGUAGE.into());
        pool.register_language("java", tree_sitter_java::LANGUAGE.into());

        pool
    }

    fn register_language(&mut self, id: &'static str, language: Language) {
        self.languages.insert(id, language);
    }

    /// Get a parser for the given language.
    ///
    /// Returns `None` if the language is not supported.
    pub fn get_parser(&mut self, language: &str) -> Option<&mut Parser> {
        let (id, ts_language) = self.languages.get_key_value(language)?;

        if !self.parsers.contains_key(id) {
            let mut parser = Parser::new();
            if let Err(e) = parser.set_language(ts_language) {
                debug!("Failed to set language '{}' for parser: {:?}", language, e);
                return None;
            }
            self.parsers.insert(*id, parser);
        }

        self.parsers.get_mut(language)
    }

    /// Check if a language is supported.
    pub fn supports(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// Detect the language of a file from its extension.
    pub fn detect_language(path: &Path) -> Option<&'static str> {
        let ext = path.extension()?.to_str()?;
        Self::detect_language_from_extension(ext)
    }

    /// Map a file extension to a language identifier.
    pub fn detect_language_from_extension(ext: &str) -> Option<&'static str> {
        match ext {
            "rs" => Some("rust"),
            "py" | "pyi" => Some("python"),
            "js" | "jsx" | "mjs" | "cjs" => Some("javascript"),
            "ts" | "mts" | "cts" => Some("typescript"),
            "tsx" => Some("tsx"),
            "go" => Some("go"),
            "java" => Some("java"),
            _ => None,
        }
    }
}

impl Default for ParserPool {
    fn default() -> Self {
        Self::new()
    }
}
