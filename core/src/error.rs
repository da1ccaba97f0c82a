//! Error types for the catalog API client.
//!
//! # Design
//! The `Display` text of every variant is the message shown to the user.
//! Status-specific variants carry the server-supplied message so the prefix
//! ("duplicate entry", "not found", ...) and the server's own explanation
//! are both visible. Transport failures keep the raw cause for logging but
//! only ever display a fixed connectivity hint.

use thiserror::Error;

use crate::http::HttpResponse;
use crate::types::ErrorBody;
use crate::validation::ValidationError;

/// Shown when the server gives no usable `message`.
pub const DEFAULT_SERVER_MESSAGE: &str = "an unknown error occurred";

/// Shown for every transport-level failure.
pub const CONNECTION_MESSAGE: &str = "network error: please check your connection";

/// Errors produced by the API wrapper.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400: the server rejected the payload.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 404: the requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// 409: a record with the same identifier already exists.
    #[error("duplicate entry: {0}")]
    Conflict(String),

    /// Any 5xx status.
    #[error("server error: {message}")]
    Server { status: u16, message: String },

    /// Any other non-2xx status.
    #[error("error ({status}): {message}")]
    Http { status: u16, message: String },

    /// The server could not be reached. The cause is for logs only.
    #[error("network error: please check your connection")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("unexpected response from server: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("could not encode request: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Map a non-2xx response to its error variant.
    pub fn from_response(response: &HttpResponse) -> Self {
        let message = serde_json::from_str::<ErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_MESSAGE.to_string());

        match response.status {
            400 => ApiError::BadRequest(message),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            status @ 500..=599 => ApiError::Server { status, message },
            status => ApiError::Http { status, message },
        }
    }

    /// HTTP status behind this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest(_) => Some(400),
            ApiError::NotFound(_) => Some(404),
            ApiError::Conflict(_) => Some(409),
            ApiError::Server { status, .. } | ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(_) | ApiError::Deserialization(_) | ApiError::Serialization(_) => None,
        }
    }
}

/// Anything a UI handler can fail with.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
