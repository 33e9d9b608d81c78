//! Log configuration and tracing subscriber setup.

use std::{io, sync::Once};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{Subscriber, level_filters::LevelFilter};
use tracing_subscriber::{
    EnvFilter, Layer, fmt::time::SystemTime, layer::SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Output format of stdout logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default `tracing-subscriber` format.
    #[default]
    Full,
    /// Single-line abbreviated format.
    Compact,
    /// Newline-delimited JSON.
    Json,
    /// Multi-line human readable format.
    Pretty,
}

/// Logging configuration for the gateway.
///
/// `stdout_format` of `None` disables stdout logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default verbosity, overridable with `RUST_LOG`.
    pub global_level: LevelFilter,
    /// Format of stdout logs.
    pub stdout_format: Option<LogFormat>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { global_level: LevelFilter::INFO, stdout_format: Some(LogFormat::Full) }
    }
}

impl LogConfig {
    /// Builds a config from a verbosity count (1 = error .. 5 = trace), a quiet
    /// flag and a stdout format.
    pub const fn new(verbosity: u8, quiet: bool, format: LogFormat) -> Self {
        let global_level = match verbosity {
            0 | 1 => LevelFilter::ERROR,
            2 => LevelFilter::WARN,
            3 => LevelFilter::INFO,
            4 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };

        Self { global_level, stdout_format: if quiet { None } else { Some(format) } }
    }

    /// Installs the global tracing subscriber. Fails if one is already set.
    pub fn init_tracing_subscriber(&self) -> eyre::Result<()> {
        let filter =
            EnvFilter::builder().with_default_directive(self.global_level.into()).from_env_lossy();

        tracing_subscriber::registry()
            .with(filter)
            .with(self.stdout_format.map(stdout_layer))
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing subscriber: {e}"))
    }
}

fn stdout_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + Send + Sync,
{
    let base = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(format != LogFormat::Json)
        .with_timer(SystemTime);

    match format {
        LogFormat::Full => Box::new(base),
        LogFormat::Compact => Box::new(base.compact()),
        LogFormat::Json => Box::new(base.json()),
        LogFormat::Pretty => Box::new(base.pretty()),
    }
}

/// Installs a test-writer subscriber once per process.
pub fn init_test_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter =
            EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();

        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}
