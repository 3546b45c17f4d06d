pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod facts;
pub mod indexer;
pub mod indexing;
pub mod logging;
pub mod symbol;

pub use config::Config;
pub use indexer::SourceRoot;
pub use indexing::{AutoloadService, IndexError, SymbolIndexBuilder};
pub use symbol::{merge_maps, AutoloadMap, SymbolIndex, SymbolKind};
