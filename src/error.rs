use std::fmt::Display;

use thiserror::Error;

pub type ConvertResult<T> = Result<T, ConvertError>;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("parameter named '{0}' not found in form")]
    MissingUploadField(String),

    #[error("invalid spreadsheet stream")]
    InvalidDocument { cause: String },

    #[error("{0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Failed to encode document: {0}")]
    EncodeFailure(String),

    #[error("Failed to read upload: {0}")]
    Upload(String),

    #[error("request timed out")]
    Timeout,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub fn invalid_document(cause: impl Display) -> Self {
        Self::InvalidDocument {
            cause: cause.to_string(),
        }
    }

    pub fn encode_failure(cause: impl Display) -> Self {
        Self::EncodeFailure(cause.to_string())
    }

    /// Underlying cause for server-side logs.
    ///
    /// `InvalidDocument` hides the codec message from clients behind a fixed
    /// text; every other variant already displays its cause.
    pub fn cause(&self) -> String {
        match self {
            Self::InvalidDocument { cause } => cause.clone(),
            other => other.to_string(),
        }
    }
}
