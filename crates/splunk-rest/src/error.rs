use savedsearch_core::ReconcileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplunkError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid management URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("provider is not configured: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SplunkError>;

impl From<SplunkError> for ReconcileError {
    fn from(err: SplunkError) -> Self {
        ReconcileError::transport(err)
    }
}
