use anyhow::{anyhow, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Default level, `RUST_LOG` wins when set.
    pub level: LevelFilter,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Compact,
        }
    }
}

/// Install the global tracing subscriber. Fails if one is already installed.
pub fn init(settings: &LoggingSettings) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(settings.level.into())
        .from_env_lossy();

    let fmt_layer = match settings.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
