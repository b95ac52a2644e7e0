//! Process-wide logging setup.
//!
//! Library code only emits through `log` macros. Binaries and tests call
//! [`init_logging`] once to route those records somewhere: a stderr writer
//! by default, or a `tracing-subscriber` pipeline with the `tracing`
//! feature (which also captures the search and scan spans).

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

/// Output encoding of log lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// `  0.012s DEBUG trackdots::scan: message`
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogInitError {
    #[error(transparent)]
    Log(#[from] log::SetLoggerError),
    #[cfg(feature = "tracing")]
    #[error(transparent)]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

static INSTALLED: OnceLock<LogConfig> = OnceLock::new();

/// Install the process logger described by `config`.
///
/// Only the first call installs anything; later calls return `Ok` and keep
/// the first configuration (see [`installed_config`]).
pub fn init_logging(config: &LogConfig) -> Result<(), LogInitError> {
    let mut result = Ok(());
    INSTALLED.get_or_init(|| {
        result = install(config);
        *config
    });
    result
}

/// Configuration of the logger installed by [`init_logging`], if any.
pub fn installed_config() -> Option<LogConfig> {
    INSTALLED.get().copied()
}

#[cfg(not(feature = "tracing"))]
fn install(config: &LogConfig) -> Result<(), LogInitError> {
    static WRITER: OnceLock<StderrWriter> = OnceLock::new();
    let writer = WRITER.get_or_init(|| StderrWriter {
        config: *config,
        started: Instant::now(),
    });
    log::set_logger(writer)?;
    log::set_max_level(config.level);
    Ok(())
}

#[cfg(feature = "tracing")]
fn install(config: &LogConfig) -> Result<(), LogInitError> {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{fmt, EnvFilter};

    // `TRACKDOTS_LOG` directives win over the configured level.
    let filter = EnvFilter::try_from_env("TRACKDOTS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str().to_ascii_lowercase()));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    match config.format {
        LogFormat::Compact => builder.compact().finish().try_init()?,
        LogFormat::Json => builder.json().flatten_event(true).finish().try_init()?,
    }
    Ok(())
}

#[cfg_attr(feature = "tracing", allow(dead_code))]
struct StderrWriter {
    config: LogConfig,
    started: Instant,
}

#[cfg_attr(feature = "tracing", allow(dead_code))]
impl StderrWriter {
    fn line(&self, record: &Record) -> String {
        let elapsed = self.started.elapsed().as_secs_f64();
        match self.config.format {
            LogFormat::Compact => format!(
                "{elapsed:8.3}s {:<5} {}: {}",
                record.level(),
                record.target(),
                record.args()
            ),
            LogFormat::Json => serde_json::json!({
                "elapsed_s": elapsed,
                "level": record.level().as_str(),
                "target": record.target(),
                "message": record.args().to_string(),
            })
            .to_string(),
        }
    }
}

impl Log for StderrWriter {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.config.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(std::io::stderr().lock(), "{}", self.line(record));
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
