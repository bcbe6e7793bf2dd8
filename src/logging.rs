// src/logging.rs
// File-based tracing setup. The TUI owns the terminal, so log output
// goes to ./logs/vakil.log instead of stdout.

use std::fs::{create_dir_all, File};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::Result;

/// Installs the global tracing subscriber. The log file starts fresh on
/// every run. `RUST_LOG` overrides the default `info` filter.
pub fn init(log_dir: &str) -> Result<()> {
    let log_dir = PathBuf::from(log_dir);
    create_dir_all(&log_dir)?;
    let log_file = File::create(log_dir.join("vakil.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}
