//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
///
/// Anything surfacing here is unrecoverable for the invoked stage and
/// terminates the process with a non-zero exit code. Per-unit oracle
/// failures never reach this type; the stages absorb them.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input or output artifact error
    #[error(transparent)]
    Artifact(#[from] tally_artifact::ArtifactError),

    /// Oracle setup error (bad manifest, missing API key)
    #[error(transparent)]
    Oracle(#[from] tally_oracle::OracleError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
