use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "phantom_authorizer=info";

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable compact lines
    #[default]
    Text,
    /// One JSON object per line, for log aggregation
    Json,
}

/// Initialize logging for the authorizer
///
/// Logs go to stderr so stdout stays reserved for decision payloads.
///
/// The log level can be controlled via the RUST_LOG environment variable:
/// - RUST_LOG=phantom_authorizer=debug  (per-stage detail)
/// - RUST_LOG=info                      (default level)
pub fn init(format: LogFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .json()
                    .with_current_span(true),
            )
            .try_init(),
    }
    .context("Failed to initialize tracing subscriber")
}
