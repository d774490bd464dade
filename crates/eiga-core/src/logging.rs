//! Tracing setup
//!
//! The TUI owns the terminal, so it logs to a daily file. Headless mode keeps
//! stdout for its JSON event stream and logs to stderr instead.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result};

/// Environment variable holding filter directives
pub const LOG_ENV: &str = "EIGA_LOG";

/// Our crates at info, everything else at warn
pub const DEFAULT_DIRECTIVES: &str = "eiga=info,warn";

const LOG_FILE_PREFIX: &str = "eiga.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// Daily rolling `eiga.log` in this directory
    File(PathBuf),
    Stderr,
}

impl LogSink {
    /// `<data_local_dir>/eiga/logs`
    pub fn default_file() -> Self {
        Self::File(log_directory(dirs::data_local_dir()))
    }
}

fn log_directory(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir
        .unwrap_or_else(|| PathBuf::from("."))
        .join("eiga")
        .join("logs")
}

/// `EIGA_LOG` when it is set and non-blank, else [`DEFAULT_DIRECTIVES`]
fn filter_directives(from_env: Option<String>) -> String {
    from_env
        .filter(|directives| !directives.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_string())
}

fn build_filter(from_env: Option<String>) -> EnvFilter {
    let directives = filter_directives(from_env);
    EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Ignoring invalid {LOG_ENV}={directives:?}: {e}");
        EnvFilter::new(DEFAULT_DIRECTIVES)
    })
}

/// Install the global subscriber
///
/// ```bash
/// EIGA_LOG=debug eiga
/// EIGA_LOG=eiga_catalog=trace eiga --headless
/// ```
pub fn init(sink: &LogSink) -> Result<()> {
    let filter = build_filter(std::env::var(LOG_ENV).ok());
    let timer = fmt::time::ChronoLocal::new(TIMESTAMP_FORMAT.to_string());

    let installed = match sink {
        LogSink::File(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(appender)
                        .with_ansi(false)
                        .with_timer(timer)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()
        }
        LogSink::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_timer(timer),
            )
            .try_init(),
    };
    installed.map_err(|e| Error::logging(e.to_string()))?;

    match sink {
        LogSink::File(dir) => tracing::info!("eiga starting, logging to {}", dir.display()),
        LogSink::Stderr => tracing::info!("eiga starting, logging to stderr"),
    }
    Ok(())
}
