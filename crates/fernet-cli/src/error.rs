//! Error types for the command-line tool.

use fernet_core::FernetError;

/// Errors that can end a `fernet` invocation.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("no key configured: pass --key, set FERNET_KEY, or add a [key] section to the config file")]
    MissingKey,
    /// A token was rejected. The specific reason is logged, never printed.
    #[error("invalid token")]
    InvalidToken,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Fernet(#[from] FernetError),
}
