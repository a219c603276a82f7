use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::camera::CameraId;

/// Boxed cause carried by [`MergeError::Transfer`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No segments found for {camera} in window {start} — {end}")]
    NotFound {
        camera: CameraId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Transfer failed ({context}): {source}")]
    Transfer {
        context: String,
        #[source]
        source: BoxError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MergeError {
    pub fn transfer(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        MergeError::Transfer { context: context.into(), source: source.into() }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, MergeError::InvalidInput(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MergeError::NotFound { .. })
    }

    pub fn is_transfer(&self) -> bool {
        matches!(self, MergeError::Transfer { .. })
    }
}

pub type Result<T> = std::result::Result<T, MergeError>;
