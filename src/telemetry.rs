//! Tracing subscriber installation.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter '{directive}': {source}")]
    InvalidFilter {
        /// Directive that failed to parse.
        directive: String,
        /// Underlying parse failure.
        source: tracing_subscriber::filter::ParseError,
    },
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Builds the filter used by [`init`].
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when `directive` is malformed.
pub fn filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directive).map_err(|source| TelemetryError::InvalidFilter {
        directive: directive.to_owned(),
        source,
    })
}

/// Installs a formatting subscriber filtered by `directive`.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the directive is malformed or a
/// subscriber is already installed.
pub fn init(directive: &str) -> Result<(), TelemetryError> {
    tracing_subscriber::registry()
        .with(filter(directive)?)
        .with(fmt::layer().with_target(true))
        .try_init()?;
    Ok(())
}
