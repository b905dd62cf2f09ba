use tracing_subscriber::fmt::layer;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Output style for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, with thread ids and source locations
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value; anything unrecognised selects `Pretty`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing(format: LogFormat) -> bool {
    match format {
        LogFormat::Json => Registry::default()
            .with(default_filter())
            .with(layer().json())
            .try_init()
            .is_ok(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(default_filter())
            .with_target(false)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .try_init()
            .is_ok(),
    }
}
