use std::io;

use thiserror::Error;

/// Faults raised by the stream harness around the filter.
///
/// Malformed vehicle records are never reported here; the validator drops
/// them without a trace.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid config file '{path}': {reason}")]
    Config { path: String, reason: String },
    #[error("unknown time zone '{0}'")]
    UnknownTimeZone(String),
    #[error("invalid delimiter '{0}': expected a single ASCII character")]
    InvalidDelimiter(String),
    #[error("{stage} channel closed before the stream ended")]
    ChannelClosed { stage: &'static str },
    #[error("pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, FilterError>;
