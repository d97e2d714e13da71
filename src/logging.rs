use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::WrapErr;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{DEFAULT_LOG_FILE, DEFAULT_LOG_FILTER, LOG_FILE_ENV};

/// Log file location, overridable through the environment
pub fn log_path() -> PathBuf {
    std::env::var_os(LOG_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

/// Installs the global subscriber.
///
/// The game owns the terminal, so logs go to a file. `RUST_LOG` overrides the default filter.
pub fn init() -> color_eyre::Result<PathBuf> {
    let path = log_path();
    let file = File::create(&path)
        .wrap_err_with(|| format!("Could not create log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .with(ErrorLayer::default())
        .try_init()
        .wrap_err("Could not install the tracing subscriber")?;

    Ok(path)
}
