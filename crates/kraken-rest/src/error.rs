//! Error types for REST API operations

use kraken_auth::AuthError;

use crate::response::ErrorCategory;
use crate::transport::TransportError;

/// Errors that can occur during REST API operations
///
/// Application-level rejections reported by Kraken (a non-empty `error`
/// array) are not errors of the query methods; they only become
/// [`RestError::Api`] when a response is converted with
/// [`ApiResponse::into_result`](crate::ApiResponse::into_result).
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Credential loading or request signing failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// HTTP request failed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Response body was not a JSON object
    #[error("Decode error: {0}")]
    Decode(String),

    /// HTTP support could not be initialised
    #[error("HTTP capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Missing API credentials for private endpoint
    #[error("Authentication required for this endpoint")]
    AuthRequired,

    /// API returned an error
    #[error("API error: {message}")]
    Api {
        /// Category of the first reported error
        category: ErrorCategory,
        /// Original error messages from the API, comma separated
        message: String,
    },
}

impl RestError {
    /// Create an API error from error strings returned by Kraken
    pub fn from_api_errors(errors: &[String]) -> Self {
        let category = errors
            .first()
            .map(|e| ErrorCategory::from_error(e))
            .unwrap_or(ErrorCategory::Unknown);

        Self::Api {
            category,
            message: errors.join(", "),
        }
    }

    /// Whether the secret could not be decoded
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Self::Auth(AuthError::InvalidCredentials(_)))
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
