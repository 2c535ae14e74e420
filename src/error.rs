//! Error types for the fallible edges of the engine.
//!
//! The detector and score tracker never fail: they only transform numbers and
//! booleans. Errors exist where the engine touches the outside world: reading
//! configuration, persisting the high score, parsing recorded sample files,
//! and acquiring a sample source.

use thiserror::Error;

/// Errors raised by configuration, persistence, and sample sources.
#[derive(Error, Debug)]
pub enum ShakeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("sample source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type ShakeResult<T> = Result<T, ShakeError>;
