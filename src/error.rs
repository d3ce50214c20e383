use std::result;

use thiserror::Error;

/// Error types for ScienceDirect client operations
#[derive(Error, Debug)]
pub enum SciDirectError {
    /// HTTP transport failed before a response was received
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported content kind requested from the transport layer
    #[error("invalid content type '{kind}', only json and pdf are supported")]
    InvalidContentType { kind: String },

    /// Invalid query structure or parameters
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Non-200 response from the API; never retried automatically
    #[error("HTTP {status} error from {url} using headers {headers}: {body}")]
    ApiError {
        status: u16,
        url: String,
        headers: String,
        body: String,
    },

    /// A payload or record lacks a key the API contract guarantees
    #[error("missing expected field `{field}` in API payload")]
    MissingField { field: String },

    /// A payload key is present but has an unusable shape
    #[error("unexpected API payload: {message}")]
    SchemaError { message: String },

    /// IO error for file operations
    #[error("IO error: {message}")]
    IoError { message: String },
}

pub type Result<T> = result::Result<T, SciDirectError>;
