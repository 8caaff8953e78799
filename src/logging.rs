//! Logging configuration and initialization.
//!
//! This module handles tracing subscriber setup based on CLI verbosity flags
//! and environment variables.

use crate::cli::LogLevel;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Filter used when no flag is given and `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info";

pub fn level_for(level: LogLevel) -> Level {
    match level {
        LogLevel::Warn => Level::WARN,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

/// Configure the tracing subscriber according to CLI verbosity flags.
///
/// Precedence:
/// 1. `quiet` forces WARN+.
/// 2. `-vv` => TRACE.
/// 3. `-v`  => DEBUG.
/// 4. Else `RUST_LOG`, defaulting to INFO.
pub fn configure_logging(level: Option<LogLevel>) {
    let builder = tracing_subscriber::fmt::Subscriber::builder();
    match level {
        Some(level) => builder.with_max_level(level_for(level)).init(),
        None => builder
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
            )
            .init(),
    }
}
