//! Error types raised by the HTTP remote store client.

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`RemoteError`] failures.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failures that can occur while talking to the remote store.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Required environment variable is missing.
    #[error("missing remote store environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build remote store client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The request did not complete within the client timeout.
    #[error("remote store request to `{path}` timed out")]
    Timeout {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent or its body could not be read.
    #[error("failed to send remote store request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The store answered with a non-success HTTP status.
    #[error("unexpected remote store response status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// Response payload was not a valid envelope.
    #[error("failed to decode remote store response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// The envelope carried `status: Error`.
    #[error("remote store refused `{path}`: {message}")]
    Refused { path: String, message: String },
}

impl From<RemoteError> for StorageError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::RequestStatus { status, .. } if status.is_client_error() => {
                StorageError::rejected(err.to_string())
            }
            RemoteError::Refused { .. } => StorageError::rejected(err.to_string()),
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
