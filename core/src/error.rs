//! Error types for the relationships client.
//!
//! # Design
//! Construction, transport and decode failures all surface as one `ApiError`
//! per operation. Nothing here retries or reclassifies a failure. `Api`
//! carries Instagram's own `meta` block so callers can match on
//! `error_type` (for example `APINotFoundError`), while `HttpError` keeps the
//! raw status and body for responses that carry no envelope at all.

use thiserror::Error;

/// Errors returned by `Client` and the `Relationships` facade.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The user id is empty or would escape its path segment.
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),

    /// The base URL or a relative path could not be resolved.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The form body could not be encoded.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server returned 404 without an API envelope.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status without an API envelope.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The API reported an error in its `meta` block.
    #[error("{error_type} ({code}): {message}")]
    Api {
        code: u16,
        error_type: String,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}
