// src/error/types.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication rejected for {path}: HTTP {status}")]
    Auth { path: String, status: u16 },

    #[error("Store returned HTTP {status} for {path}: {body}")]
    Store {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    /// True for failures reaching or talking to the remote store.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::Transport(_) | AppError::Auth { .. } | AppError::Store { .. }
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
