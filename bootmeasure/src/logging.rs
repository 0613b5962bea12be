//! Diagnostic logging for the CLI.
//!
//! The core library only emits `tracing` events; this module decides where
//! they go. Level precedence: `BOOTMEASURE_LOG` env filter, then `-v` count.
//! Output goes to stderr unless a log file is given, in which case the file
//! is opened once here and appended to for the life of the process.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "BOOTMEASURE_LOG";

/// Map `-v` occurrences onto a default level.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn build_env_filter(verbosity: u8) -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(directive) if !directive.is_empty() => EnvFilter::new(directive),
        _ => EnvFilter::new(level_for(verbosity)),
    }
}

/// Install the global subscriber.
pub fn init_logging(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
    let filter = build_env_filter(verbosity);
    let base_subscriber = Registry::default().with(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory {}", parent.display())
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            base_subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(Arc::new(file)),
                )
                .try_init()
                .context("Failed to install log subscriber")?;
        }
        None => {
            base_subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .context("Failed to install log subscriber")?;
        }
    }

    Ok(())
}
