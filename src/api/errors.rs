//! Backend client errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the storefront backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend refused the request and said why.
    #[error("{0}")]
    Rejected(String),

    /// The backend answered with a non-2xx status and no message.
    #[error("request failed with status {0}")]
    Status(StatusCode),

    /// The backend answered with a body that could not be understood.
    #[error("unexpected response from backend: {0}")]
    UnexpectedResponse(String),
}

impl ApiError {
    /// The backend's own explanation, when it gave one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected(message) => Some(message),
            ApiError::Http(_) | ApiError::Status(_) | ApiError::UnexpectedResponse(_) => None,
        }
    }
}
