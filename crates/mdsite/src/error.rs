//! CLI error types.

use mdsite_config::ConfigError;
use mdsite_files::ConflictError;
use mdsite_nav::{DeclarationError, UnregisteredFile};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Conflict(#[from] ConflictError),

    #[error("{0}")]
    Declaration(#[from] DeclarationError),

    #[error("{0}")]
    Unregistered(#[from] UnregisteredFile),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
