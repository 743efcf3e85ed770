use std::io::{self, IsTerminal};

use thiserror::Error;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::{self, time::ChronoUtc, writer::BoxMakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry};

use koe_core::config::LoggingConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("cannot open log file: {0}")]
    Appender(#[from] InitError),

    #[error("log file path has no file name")]
    FileName,

    #[error("logging already initialized: {0}")]
    Init(#[from] TryInitError),
}

/// Pick the filter directive: `-v` / `-vv` beat the configured filter.
fn filter_directive(config: &LoggingConfig, verbose: u8) -> &str {
    match verbose {
        0 => &config.filter,
        // hyper is chatty at debug
        1 => "debug,hyper=info,reqwest=info",
        _ => "trace",
    }
}

/// Install the global subscriber. `RUST_LOG` overrides everything else.
pub fn init_logging(config: &LoggingConfig, verbose: u8) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directive(config, verbose))?,
    };

    let (writer, ansi) = match &config.file {
        Some(path) => {
            let dir = path.parent().filter(|d| !d.as_os_str().is_empty());
            let prefix = path
                .file_stem()
                .and_then(|n| n.to_str())
                .ok_or(LoggingError::FileName)?;
            // koe.log -> koe.2026-01-17.log
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(prefix)
                .filename_suffix("log")
                .build(dir.unwrap_or_else(|| std::path::Path::new(".")))?;
            (BoxMakeWriter::new(appender), false)
        }
        None => (BoxMakeWriter::new(io::stderr), io::stderr().is_terminal()),
    };

    let layer: Box<dyn Layer<Registry> + Send + Sync> = if config.json {
        fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(writer)
            .boxed()
    } else {
        fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()?;
    Ok(())
}
