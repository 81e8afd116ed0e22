//! API credentials for Kraken's private REST endpoints
//!
//! Implements HMAC-SHA512 signing as required by Kraken's private endpoints.
//!
//! # Security
//!
//! The API secret is stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretBox};
use sha2::{Digest, Sha256, Sha512};

use crate::error::{AuthError, AuthResult};

type HmacSha512 = Hmac<Sha512>;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "KRAKEN_API_KEY";
/// Environment variable holding the base64 encoded API secret
pub const API_SECRET_ENV: &str = "KRAKEN_PRIVATE_KEY";

/// API credentials for authenticated requests
///
/// The secret is decoded once, when the credentials are created, so a
/// malformed secret is reported before any request is built. It is
/// zeroized when the credentials are dropped.
pub struct Credentials {
    /// API key (public, sent verbatim in the `API-Key` header)
    api_key: String,
    /// API secret (decoded from base64, zeroized on drop)
    api_secret: SecretBox<Vec<u8>>,
}

impl Credentials {
    /// Create new credentials from an API key and a base64 encoded secret
    ///
    /// # Arguments
    /// * `api_key` - Your Kraken API key
    /// * `api_secret` - Your API secret (standard base64 with padding)
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] if the secret is not valid
    /// base64. Malformed padding, characters outside the standard alphabet
    /// and embedded whitespace are all rejected.
    pub fn new(api_key: impl Into<String>, api_secret: impl AsRef<str>) -> AuthResult<Self> {
        let decoded = BASE64.decode(api_secret.as_ref()).map_err(|e| {
            AuthError::InvalidCredentials(format!("Invalid base64 API secret: {}", e))
        })?;

        Ok(Self {
            api_key: api_key.into(),
            api_secret: SecretBox::new(Box::new(decoded)),
        })
    }

    /// Create credentials from environment variables
    ///
    /// Reads `KRAKEN_API_KEY` and `KRAKEN_PRIVATE_KEY` from the environment.
    pub fn from_env() -> AuthResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(API_KEY_ENV.to_string()))?;
        let api_secret = std::env::var(API_SECRET_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(API_SECRET_ENV.to_string()))?;

        Self::new(api_key, api_secret)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the decoded secret bytes
    pub fn expose_secret(&self) -> &[u8] {
        self.api_secret.expose_secret()
    }

    /// Sign a request for Kraken's API
    ///
    /// Kraken signature algorithm:
    /// 1. SHA256(nonce + POST_data), kept as raw bytes
    /// 2. HMAC-SHA512(api_secret, uri_path + SHA256_result)
    /// 3. Base64 encode result
    ///
    /// # Arguments
    /// * `path` - API endpoint path (e.g., "/0/private/Balance")
    /// * `nonce` - Nonce included in the POST data
    /// * `post_data` - URL-encoded POST body, byte-identical to what is sent
    pub fn sign(&self, path: &str, nonce: &str, post_data: &str) -> AuthResult<String> {
        let mut sha256 = Sha256::new();
        sha256.update(nonce.as_bytes());
        sha256.update(post_data.as_bytes());
        let sha256_result = sha256.finalize();

        let mut mac = HmacSha512::new_from_slice(self.api_secret.expose_secret())
            .map_err(|e| AuthError::InvalidCredentials(e.to_string()))?;
        mac.update(path.as_bytes());
        mac.update(&sha256_result);

        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

impl Clone for Credentials {
    /// Clone credentials (creates new SecretBox with same content)
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            api_secret: SecretBox::new(Box::new(self.api_secret.expose_secret().clone())),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.api_key.chars().take(8).collect();
        f.debug_struct("Credentials")
            .field("api_key", &format!("{}...", prefix))
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}
