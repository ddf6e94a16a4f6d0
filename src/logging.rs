//! Logging setup for comanda
//!
//! Logs always go to stderr so report and export output on stdout stays
//! clean. With `log_to_file` set in the config, they are also written to daily
//! rotating files in the platform data directory:
//!
//! - `comanda.<date>.log`: everything that passes the filter
//! - `error.<date>.log`: warnings and errors only
//!
//! The filter defaults to `info` and can be overridden with `RUST_LOG`.
//!
//! ```no_run
//! comanda::logging::init(false)?;
//! tracing::info!("Loaded workbook");
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

const MAX_LOG_FILES: usize = 10;

/// Gets the log directory path based on platform conventions
///
/// Returns:
/// - Windows: `%APPDATA%/comanda/logs`
/// - macOS: `~/Library/Application Support/comanda/logs`
/// - Linux: `~/.local/share/comanda/logs`
///
/// # Errors
///
/// Returns error if the platform has no data directory.
pub fn log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    Ok(base_dir.join("comanda").join("logs"))
}

fn daily_appender(dir: &Path, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("Failed to create {prefix} log appender"))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns error if the log directory or file appenders cannot be created,
/// or a global subscriber is already installed.
pub fn init(log_to_file: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layers, dir) = if log_to_file {
        let dir = log_dir()?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

        let all_logs = fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .with_writer(daily_appender(&dir, "comanda")?);

        let error_logs = fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .with_writer(daily_appender(&dir, "error")?)
            .with_filter(EnvFilter::new("warn"));

        (Some(all_logs.and_then(error_logs)), Some(dir))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(dir) = dir {
        tracing::debug!(log_dir = %dir.display(), "File logging enabled");
    }

    Ok(())
}
