//! Logging configuration using tracing
//!
//! The TUI owns the terminal, so diagnostics go to daily-rotated files
//! under `<data dir>/logs/` instead of stderr. Log level is controlled
//! by the `TELEDEX_LOG` environment variable, e.g. `TELEDEX_LOG=debug`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
pub fn init(data_dir: &Path) -> Result<()> {
    let log_dir = data_dir.join("logs");
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "teledex.log");

    // Default to info, allow override via TELEDEX_LOG
    let env_filter = EnvFilter::try_from_env("TELEDEX_LOG")
        .unwrap_or_else(|_| EnvFilter::new("teledex=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("teledex starting");
    tracing::info!("log directory: {}", log_dir.display());

    Ok(())
}
