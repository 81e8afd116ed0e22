//! Credential handling and request signing for Kraken's private REST API
//!
//! This crate builds the authenticated part of a private request: the
//! form-encoded body (with its nonce) and the `API-Key` / `API-Sign`
//! headers. It performs no I/O; hand the resulting [`SignedRequest`] to any
//! HTTP client.
//!
//! # Signing
//!
//! ```text
//! API-Sign = base64(HMAC-SHA512(secret, path + SHA256(nonce + body)))
//! ```
//!
//! # Example
//!
//! ```no_run
//! use kraken_auth::{Credentials, RequestParams, RequestSigner};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load credentials from environment
//!     let creds = Credentials::from_env()?;
//!     let signer = RequestSigner::new(creds);
//!
//!     let params = RequestParams::new().with("trades", true);
//!     let signed = signer.sign("OpenOrders", params)?;
//!
//!     for (name, value) in signed.headers() {
//!         println!("{}: {}", name, value);
//!     }
//!     println!("POST {}\n{}", signed.path, signed.body);
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
pub mod nonce;
mod params;
mod signer;

pub use credentials::{Credentials, API_KEY_ENV, API_SECRET_ENV};
pub use error::{AuthError, AuthResult};
pub use nonce::{format_nonce, Clock, FixedClock, MonotonicClock, SystemClock, Timestamp};
pub use params::{ParamValue, RequestParams};
pub use signer::{
    RequestSigner, SignedRequest, API_KEY_HEADER, API_SIGN_HEADER, DEFAULT_API_VERSION,
    NONCE_PARAM,
};
