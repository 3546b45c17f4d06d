//! Logging configuration and initialization.
//!
//! Stderr output is filtered by `RUST_LOG` when set, otherwise by the
//! configured level. File output goes through a rolling appender.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Guard that must be held for the lifetime of the application.
/// When dropped, flushes any pending log writes.
#[must_use = "Dropping this guard will stop logging - keep it alive for the program's lifetime"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
    _stderr_guard: Option<WorkerGuard>,
}

/// Initialize the logging subsystem based on configuration.
///
/// `verbosity` raises the stderr level (1 = debug, 2+ = trace) unless
/// `RUST_LOG` is set.
pub fn init_logging(
    config: &LoggingConfig,
    project_root: &Path,
    verbosity: u8,
) -> Result<LoggingGuard> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut file_guard = None;
    let mut stderr_guard = None;

    if config.enabled {
        let (layer, guard) = file_layer(config, project_root)?;
        layers.push(layer);
        file_guard = Some(guard);
    }

    if config.stderr {
        let (layer, guard) = stderr_layer(&effective_level(&config.level, verbosity));
        layers.push(layer);
        stderr_guard = Some(guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("Failed to initialize logging subscriber")?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
        _stderr_guard: stderr_guard,
    })
}

fn file_layer(config: &LoggingConfig, project_root: &Path) -> Result<(BoxedLayer, WorkerGuard)> {
    let log_dir = resolve_log_dir(&config.directory, project_root);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender =
        RollingFileAppender::new(parse_rotation(&config.rotation), &log_dir, &config.file_prefix);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(parse_level(&config.level))
        .boxed();

    Ok((layer, guard))
}

fn stderr_layer(level: &str) -> (BoxedLayer, WorkerGuard) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| parse_level(level));
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_filter(filter)
        .boxed();

    (layer, guard)
}

fn effective_level(configured: &str, verbosity: u8) -> String {
    match verbosity {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

fn resolve_log_dir(directory: &Path, project_root: &Path) -> PathBuf {
    if directory.is_absolute() {
        directory.to_path_buf()
    } else {
        project_root.join(directory)
    }
}

fn parse_level(level: &str) -> EnvFilter {
    let level_str = match level.to_lowercase().as_str() {
        "trace" => "defindex=trace",
        "debug" => "defindex=debug",
        "info" => "defindex=info",
        "warn" => "defindex=warn",
        "error" => "defindex=error",
        _ => {
            eprintln!("Warning: Unknown log level '{}', defaulting to 'info'", level);
            "defindex=info"
        }
    };
    EnvFilter::new(level_str)
}

fn parse_rotation(rotation: &str) -> Rotation {
    match rotation.to_lowercase().as_str() {
        "hourly" => Rotation::HOURLY,
        "daily" => Rotation::DAILY,
        "minutely" => Rotation::MINUTELY,
        "never" => Rotation::NEVER,
        _ => {
            eprintln!(
                "Warning: Unknown rotation strategy '{}', defaulting to 'daily'",
                rotation
            );
            Rotation::DAILY
        }
    }
}
