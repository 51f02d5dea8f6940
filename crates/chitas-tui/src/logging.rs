//! Logging configuration using tracing

use std::path::PathBuf;
use anyhow::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize file logging
///
/// Logs are written to `<data dir>/chitas/logs/`, since the terminal itself
/// is taken over by the UI. The level is controlled by `CHITAS_LOG`:
///
/// ```bash
/// CHITAS_LOG=debug chitas
/// ```
pub fn init() -> Result<()> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "chitas.log");

    let env_filter = EnvFilter::try_from_env("CHITAS_LOG")
        .unwrap_or_else(|_| EnvFilter::new("chitas=info,chitas_core=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("chitas {} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("log directory: {}", log_dir.display());

    Ok(())
}

fn log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("chitas").join("logs")
}
