//! Error types for credential handling and request signing

/// Errors that can occur while loading credentials or signing a request
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// API secret could not be decoded
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// Request parameter has a shape the API cannot accept
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Form encoding of the request body failed
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
