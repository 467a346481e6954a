//! Tracing and logging support.
//!
//! The engine itself logs through the `tracing` crate (registration,
//! binding decisions, injection misses). Hosts that want those events
//! on a console can initialize a subscriber here; hosts with their own
//! subscriber setup can ignore this module entirely.

pub use tracing::{self, debug, error, info, instrument, trace, warn};

#[cfg(feature = "subscriber")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Subscriber output format.
#[cfg(feature = "subscriber")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable format with colors (default for development).
    Pretty,

    /// Compact format without colors.
    Compact,

    /// JSON format (recommended for production).
    Json,
}

/// Subscriber configuration.
#[cfg(feature = "subscriber")]
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Log level filter. If None, uses the RUST_LOG environment
    /// variable or defaults to "info".
    pub level: Option<tracing::Level>,

    /// Output format.
    pub format: TracingFormat,

    /// Include timestamps in output.
    pub timestamps: bool,

    /// Include target module names in output.
    pub target: bool,
}

#[cfg(feature = "subscriber")]
impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: TracingFormat::Pretty,
            timestamps: true,
            target: true,
        }
    }
}

/// Initialize a tracing subscriber with default settings.
///
/// Uses the RUST_LOG environment variable for level filtering and
/// defaults to "info" when it is not set.
#[cfg(feature = "subscriber")]
pub fn init_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize a tracing subscriber with custom configuration.
#[cfg(feature = "subscriber")]
pub fn init_subscriber_with_config(config: TracingConfig) {
    let filter = if let Some(level) = config.level {
        EnvFilter::new(level.to_string())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    let layer = tracing_subscriber::fmt::layer().with_target(config.target);
    match (config.format, config.timestamps) {
        (TracingFormat::Pretty, true) => registry.with(layer.pretty()).init(),
        (TracingFormat::Pretty, false) => registry.with(layer.pretty().without_time()).init(),
        (TracingFormat::Compact, true) => registry.with(layer.compact()).init(),
        (TracingFormat::Compact, false) => registry.with(layer.compact().without_time()).init(),
        (TracingFormat::Json, true) => registry.with(layer.json()).init(),
        (TracingFormat::Json, false) => registry.with(layer.json().without_time()).init(),
    }
}

// Fallback when the subscriber feature is disabled
#[cfg(not(feature = "subscriber"))]
pub fn init_subscriber() {
    // No-op without the subscriber feature
}
