use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("not initialized: no .savedsearch directory under the project root")]
    NotInitialized,

    #[error("{0}")]
    Remote(String),

    #[error("unable to find resource: {0}")]
    NotFound(String),

    #[error("state migration failed: {0}")]
    Migration(String),

    #[error("invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ReconcileError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
