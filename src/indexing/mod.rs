//! Index building: one root at a time, then merged across roots

pub mod builder;
pub mod errors;
pub mod service;

pub use builder::{BuildResult, SymbolIndexBuilder};
pub use errors::IndexError;
pub use service::{AutoloadService, CachedSummary, RootStatus};
