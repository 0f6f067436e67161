//! Subscriber setup

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// How log lines are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Options for [`init_telemetry`]
#[derive(Debug, Clone, Default)]
pub struct TelemetryOptions {
    /// Log at `debug` regardless of `RUST_LOG`
    pub debug: bool,
    pub format: LogFormat,
}

impl TelemetryOptions {
    fn env_filter(&self) -> EnvFilter {
        if self.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        }
    }
}

/// Initialize logging.
///
/// Log lines go to stderr. Fails if a global subscriber was already set.
pub fn init_telemetry(options: &TelemetryOptions) -> Result<(), TryInitError> {
    let json = options.format == LogFormat::Json;
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_line_number(options.debug)
    });
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(true)
    });

    tracing_subscriber::registry()
        .with(text_layer)
        .with(json_layer)
        .with(options.env_filter())
        .try_init()
}
