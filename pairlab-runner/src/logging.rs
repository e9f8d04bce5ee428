//! Tracing subscriber setup.
//!
//! The CLI logs to stderr. The TUI owns the terminal, so it logs to a file.
//! `RUST_LOG` overrides the configured level in both cases.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter from `RUST_LOG`, falling back to `level`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Compact logs on stderr. Calling twice is harmless; the second call is ignored.
pub fn init_stderr(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Append logs to `path`, creating parent directories as needed.
pub fn init_file(level: &str, path: &Path) -> std::io::Result<()> {
    let file = open_log_file(path)?;
    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();
    Ok(())
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
