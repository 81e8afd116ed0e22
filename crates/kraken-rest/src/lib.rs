//! REST API client for Kraken cryptocurrency exchange
//!
//! This crate provides a REST API client for Kraken's public market data and
//! private account/trading methods.
//!
//! # Features
//!
//! - **Generic queries**: [`KrakenRestClient::query_public`] and
//!   [`KrakenRestClient::query_private`] reach any method by name
//! - **Market Data**: Server time, assets, ticker, order book, recent trades
//! - **Account**: Balances, trade balance, open orders
//! - **Trading**: Place orders (with conditional close), cancel orders
//!
//! # Authentication
//!
//! Private endpoints require API credentials. Requests are signed with
//! HMAC-SHA512 by [`kraken_auth::RequestSigner`], as specified by Kraken's
//! API documentation.
//!
//! # Example
//!
//! ```no_run
//! use kraken_rest::{KrakenRestClient, Credentials, RequestParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let client = KrakenRestClient::new()?;
//!     let ticker = client.ticker("XBTUSD").await?;
//!     println!("BTC/USD: {}", ticker.result);
//!
//!     // Private endpoints (auth required)
//!     let creds = Credentials::from_env()?;
//!     let auth_client = KrakenRestClient::with_credentials(creds)?;
//!     let orders = auth_client
//!         .query_private("OpenOrders", RequestParams::new().with("trades", true))
//!         .await?;
//!
//!     if orders.is_success() {
//!         println!("Open orders: {}", orders.result);
//!     } else {
//!         println!("Kraken rejected the call: {:?}", orders.error);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Only transport, decoding and credential/signing failures are returned as
//! `Err`. Errors reported by Kraken itself stay in [`ApiResponse::error`]
//! until converted with [`ApiResponse::into_result`].

pub mod client;
pub mod endpoints;
pub mod error;
pub mod response;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::{ClientConfig, KrakenRestClient, DEFAULT_BASE_URL};
pub use error::{RestError, RestResult};
pub use response::{ApiErrorInfo, ApiResponse, ErrorCategory};
pub use transport::{HttpRequest, HttpTransport, Transport, TransportError, FORM_CONTENT_TYPE};

// Re-export signing types
pub use kraken_auth::{Credentials, ParamValue, RequestParams};

// Re-export endpoint-specific types
pub use types::{
    CancelOrderResult, CloseOrder, OrderFlag, OrderRequest, OrderResponse, OrderSide, OrderType,
    ServerTime,
};
