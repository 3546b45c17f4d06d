use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cache::DEFAULT_GRACE_SECS;
use crate::indexer::{normalize_path, Mtime, SourceRoot, DEFAULT_PATTERN};

/// Per-project state directory holding the config file and logs.
pub const CONFIG_DIR: &str = ".defindex";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Prefix stripped from indexed file paths (default: the directory
    /// holding `.defindex/`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,

    /// Source roots in priority order; later roots win on name collisions
    #[serde(default = "default_roots")]
    pub roots: Vec<SourceRoot>,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub extractor: ExtractorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: None,
            roots: default_roots(),
            cache: CacheConfig::default(),
            extractor: ExtractorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_roots() -> Vec<SourceRoot> {
    vec![SourceRoot::new("src", DEFAULT_PATTERN)]
}

/// Which cache backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    /// One JSON file per root under the cache directory (default)
    #[default]
    File,
    /// Process-local map, lost on exit
    Memory,
    /// No caching; every build rescans
    Disabled,
}

impl std::fmt::Display for CacheBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Memory => write!(f, "memory"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackendKind,

    /// Directory for the file backend (default: platform data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Seconds a root may be newer than its cached index and still count
    /// as fresh
    #[serde(default = "default_grace_secs")]
    pub grace_secs: Mtime,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::default(),
            directory: None,
            grace_secs: default_grace_secs(),
        }
    }
}

fn default_grace_secs() -> Mtime {
    DEFAULT_GRACE_SECS
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Number of parallel threads for extraction (None = auto-detect)
    #[serde(default)]
    pub parallel_threads: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to rotating files
    #[serde(default)]
    pub enabled: bool,

    /// Write logs to stderr
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory, relative to the project root unless absolute
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// hourly, daily, minutely or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stderr: true,
            level: default_log_level(),
            directory: default_log_directory(),
            file_prefix: default_file_prefix(),
            rotation: default_rotation(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join("logs")
}

fn default_file_prefix() -> String {
    "defindex.log".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Config {
    /// Load configuration from the .defindex directory
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = Self::config_path(root);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;

            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the .defindex directory
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_dir = Self::config_dir(root);
        let config_path = Self::config_path(root);

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the .defindex directory
    pub fn config_dir(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR)
    }

    pub fn config_path(root: &Path) -> PathBuf {
        Self::config_dir(root).join(CONFIG_FILE)
    }

    /// Check if defindex is initialized in the given directory
    pub fn is_initialized(root: &Path) -> bool {
        Self::config_path(root).exists()
    }

    /// The fixed prefix stripped from indexed paths, resolved against the
    /// directory the configuration was loaded from, with `.` and `..`
    /// folded away.
    pub fn project_root(&self, root: &Path) -> PathBuf {
        let path = match &self.project_root {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => root.join(path),
            None => root.to_path_buf(),
        };
        normalize_path(&path)
    }
}
