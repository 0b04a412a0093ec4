//! Diagnostics for the extension module.
//!
//! Output goes to stderr through a `tracing-subscriber` fmt layer. The filter
//! comes from the `SPHERELY_LOG` environment variable (same syntax as
//! `RUST_LOG`) and defaults to `warn`.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SPHERELY_LOG";
pub const DEFAULT_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        match std::env::var(LOG_ENV) {
            Ok(filter) if !filter.trim().is_empty() => Self { filter },
            _ => Self::default(),
        }
    }

    pub fn env_filter(&self) -> Result<EnvFilter, ParseError> {
        EnvFilter::try_new(&self.filter)
    }
}

/// Install the global subscriber. Safe to call more than once; the host
/// process may already have one, in which case it is kept.
///
/// A bad `SPHERELY_LOG` directive falls back to the default filter and is
/// reported once the subscriber is up.
pub fn init(config: &LogConfig) {
    let (filter, rejected) = match config.env_filter() {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new(DEFAULT_FILTER), Some(err)),
    };
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
        .is_ok();
    if !installed {
        tracing::debug!("tracing subscriber already installed");
    }
    if let Some(err) = rejected {
        tracing::warn!(filter = %config.filter, %err, "invalid {LOG_ENV}, using default filter");
    }
}
