//! Symbol index data types
//!
//! This module holds the forward index (file → declarations), the reverse
//! index (kind → name → file) and the autoload map projection that gets
//! merged across roots and handed to a loader.

pub mod index;
pub mod map;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub use index::{FileRecord, SymbolIndex};
pub use map::{merge_maps, AutoloadMap};

/// Kinds of symbols tracked by the reverse index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Classes, structs, traits, interfaces, enums
    Class,
    /// Free functions
    Function,
    /// Type aliases
    Type,
    /// Constants (case sensitive)
    Constant,
}

impl SymbolKind {
    /// All kinds, in the order partitions are reported.
    pub const ALL: [SymbolKind; 4] = [
        SymbolKind::Class,
        SymbolKind::Function,
        SymbolKind::Type,
        SymbolKind::Constant,
    ];

    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Function => "function",
            SymbolKind::Type => "type",
            SymbolKind::Constant => "constant",
        }
    }

    /// Parse from a string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "class" => Some(SymbolKind::Class),
            "function" => Some(SymbolKind::Function),
            "type" => Some(SymbolKind::Type),
            "constant" => Some(SymbolKind::Constant),
            _ => None,
        }
    }

    /// Whether names of this kind are looked up case-insensitively.
    pub fn is_case_insensitive(&self) -> bool {
        !matches!(self, SymbolKind::Constant)
    }

    /// Apply this kind's case rule to a declared name.
    ///
    /// Class, function and type alias names are lower-cased; constants keep
    /// their exact spelling.
    pub fn normalize<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.is_case_insensitive() {
            Cow::Owned(name.to_lowercase())
        } else {
            Cow::Borrowed(name)
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
