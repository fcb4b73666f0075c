//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Lexicon cache error
    #[error("Store error: {0}")]
    Store(#[from] etymtag_store::StoreError),

    /// Fatal resolution error
    #[error("Resolution error: {0}")]
    Resolve(#[from] etymtag_resolver::ResolveError),

    /// Lookup source setup error
    #[error("Lookup error: {0}")]
    Lookup(#[from] etymtag_lookup::LookupError),

    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output records could not be written or read back
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed configuration file
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed token or seed file
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A worker task panicked or was aborted
    #[error("Task failed: {0}")]
    Task(String),
}
