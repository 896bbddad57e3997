use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cannot open input file '{}': {source}", path.display())]
    MissingFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed record at line {line}, field '{field}': {reason}")]
    MalformedRecord {
        line: u64,
        field: String,
        reason: String,
    },

    #[error("Invalid input: {0}")]
    InvalidUserInput(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl EngineError {
    pub fn malformed(line: u64, field: &str, reason: impl Into<String>) -> Self {
        EngineError::MalformedRecord {
            line,
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Errors the interactive loop can recover from by asking again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::InvalidUserInput(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
