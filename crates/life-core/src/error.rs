//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported pattern format: header {header:?}")]
    UnsupportedFormat { header: String },

    #[error("Malformed pattern line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("Cell ({x}, {y}) is outside a grid of size {size}")]
    OutOfRange { x: i32, y: i32, size: usize },

    #[error("No configuration loaded")]
    NotConfigured,

    #[error("Grid size {size} exceeds the limit of {limit}")]
    GridTooLarge { size: u64, limit: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl Error {
    pub fn malformed(line: usize, content: &str) -> Self {
        Error::MalformedLine {
            line,
            content: content.to_string(),
        }
    }
}
