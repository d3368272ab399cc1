use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by persistence gateways regardless of the underlying transport.
///
/// Both variants are retried by the save coordinator; the split only drives logging.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Store unreachable: transport failure, timeout or server-side error.
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// Store reachable but refused the request.
    #[error("storage rejected request: {message}")]
    Rejected { message: String },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a rejection error.
    pub fn rejected(message: impl Into<String>) -> Self {
        StorageError::Rejected {
            message: message.into(),
        }
    }

    /// Whether the store answered but refused the payload.
    pub fn is_rejection(&self) -> bool {
        matches!(self, StorageError::Rejected { .. })
    }
}
