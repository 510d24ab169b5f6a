use thiserror::Error;

/// Result type alias for chatlens-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the chatlens transcript viewer
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A parse run produced zero valid message records
    #[error("no messages could be parsed from the transcript")]
    NoMessagesParsed,

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}
