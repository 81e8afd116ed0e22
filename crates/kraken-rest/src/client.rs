//! Main REST client implementation

use kraken_auth::{Credentials, RequestParams, RequestSigner, API_KEY_ENV, DEFAULT_API_VERSION};
use tracing::{debug, info, instrument};

use crate::endpoints::{AccountEndpoints, MarketEndpoints, TradingEndpoints};
use crate::error::{RestError, RestResult};
use crate::response::ApiResponse;
use crate::transport::{HttpRequest, HttpTransport, Transport};
use crate::types::{CancelOrderResult, OrderRequest, OrderResponse, ServerTime};

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://api.kraken.com";

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default user agent
const DEFAULT_USER_AGENT: &str = concat!("kraken-rest/", env!("CARGO_PKG_VERSION"));

/// Kraken REST API client
///
/// Provides access to both public and private endpoints. Remote errors
/// (a non-empty `error` array) are returned inside [`ApiResponse`], not as
/// `Err`; only transport, decoding and signing failures are errors.
///
/// # Example
///
/// ```no_run
/// use kraken_rest::{KrakenRestClient, Credentials, RequestParams};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public endpoints only
///     let client = KrakenRestClient::new()?;
///     let ticker = client.ticker("XBTUSD").await?;
///     println!("{}", ticker.result);
///
///     // With authentication for private endpoints
///     let creds = Credentials::from_env()?;
///     let auth_client = KrakenRestClient::with_credentials(creds)?;
///     let balance = auth_client.query_private("Balance", RequestParams::new()).await?;
///     println!("{:?}", balance.error);
///
///     Ok(())
/// }
/// ```
pub struct KrakenRestClient<T = HttpTransport> {
    transport: T,
    signer: Option<RequestSigner>,
    base_url: String,
    path_prefix: String,
    version: String,
}

impl KrakenRestClient<HttpTransport> {
    /// Create a new client without authentication
    ///
    /// Only public endpoints will be available.
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with credentials
    ///
    /// All endpoints (public and private) will be available.
    pub fn with_credentials(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::default().with_credentials(credentials))
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// Returns [`RestError::CapabilityUnavailable`] if the HTTP client cannot
    /// be built.
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> KrakenRestClient<T> {
    /// Create a client that sends requests through the given transport
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let signer = config.credentials.map(|credentials| {
            RequestSigner::new(credentials)
                .with_version(config.version.as_str())
                .with_path_prefix(config.path_prefix.as_str())
        });

        info!(
            base_url = %config.base_url,
            authenticated = signer.is_some(),
            "Created Kraken REST client"
        );

        Self {
            transport,
            signer,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            path_prefix: config.path_prefix,
            version: config.version,
        }
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.signer.is_some()
    }

    /// The transport used by this client
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// URL path of a public method
    pub fn public_path(&self, method: &str) -> String {
        format!("{}/{}/public/{}", self.path_prefix, self.version, method)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Call a public method
    ///
    /// Parameters are form-encoded into the POST body; nothing is signed.
    #[instrument(skip(self, params))]
    pub async fn query_public(
        &self,
        method: &str,
        params: RequestParams,
    ) -> RestResult<ApiResponse> {
        let body = params.to_form()?;
        let request = HttpRequest::new(self.url(&self.public_path(method)), body);

        debug!("Making public request");

        let raw = self.transport.post(request).await?;
        ApiResponse::decode(&raw)
    }

    /// Call a private method
    ///
    /// A nonce is added unless `params` already contains one.
    ///
    /// # Errors
    /// Returns [`RestError::AuthRequired`] if the client has no credentials.
    #[instrument(skip(self, params))]
    pub async fn query_private(
        &self,
        method: &str,
        params: RequestParams,
    ) -> RestResult<ApiResponse> {
        let signer = self.signer.as_ref().ok_or(RestError::AuthRequired)?;
        let signed = signer.sign(method, params)?;

        let mut request = HttpRequest::new(self.url(&signed.path), signed.body.as_str());
        for (name, value) in signed.headers() {
            request = request.with_header(name, value);
        }

        debug!(path = %signed.path, "Making authenticated request");

        let raw = self.transport.post(request).await?;
        ApiResponse::decode(&raw)
    }

    // ========================================================================
    // Public Market Endpoints
    // ========================================================================

    /// Get market endpoints
    pub fn market(&self) -> MarketEndpoints<'_, T> {
        MarketEndpoints::new(self)
    }

    /// Get server time
    pub async fn server_time(&self) -> RestResult<ServerTime> {
        self.market().server_time().await?.into_result()
    }

    /// Get info on all assets
    pub async fn assets(&self) -> RestResult<ApiResponse> {
        self.market().assets(None).await
    }

    /// Get ticker information for a trading pair
    pub async fn ticker(&self, pair: &str) -> RestResult<ApiResponse> {
        self.market().ticker(pair).await
    }

    /// Get recent trades for a pair, optionally since a cursor
    pub async fn trades(&self, pair: &str, since: Option<&str>) -> RestResult<ApiResponse> {
        self.market().trades(pair, since).await
    }

    // ========================================================================
    // Private Account Endpoints
    // ========================================================================

    /// Get account endpoints (requires credentials)
    pub fn account(&self) -> RestResult<AccountEndpoints<'_, T>> {
        if !self.has_credentials() {
            return Err(RestError::AuthRequired);
        }
        Ok(AccountEndpoints::new(self))
    }

    /// Get account balance
    pub async fn balance(&self) -> RestResult<ApiResponse> {
        self.account()?.balance().await
    }

    /// Get open orders, optionally with related trades
    pub async fn open_orders(&self, trades: bool) -> RestResult<ApiResponse> {
        self.account()?.open_orders(trades).await
    }

    // ========================================================================
    // Private Trading Endpoints
    // ========================================================================

    /// Get trading endpoints (requires credentials)
    pub fn trading(&self) -> RestResult<TradingEndpoints<'_, T>> {
        if !self.has_credentials() {
            return Err(RestError::AuthRequired);
        }
        Ok(TradingEndpoints::new(self))
    }

    /// Place a new order
    pub async fn add_order(&self, order: &OrderRequest) -> RestResult<OrderResponse> {
        self.trading()?.add_order(order).await?.into_result()
    }

    /// Cancel an order by transaction ID
    pub async fn cancel_order(&self, txid: &str) -> RestResult<CancelOrderResult> {
        self.trading()?.cancel_order(txid).await?.into_result()
    }
}

impl<T> std::fmt::Debug for KrakenRestClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KrakenRestClient")
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .field("has_credentials", &self.signer.is_some())
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Scheme and host, e.g. `https://api.kraken.com`
    pub base_url: String,
    /// Path placed before the version segment (signed as part of the path)
    pub path_prefix: String,
    /// API version segment
    pub version: String,
    /// Verify the server's TLS certificate
    pub ssl_verify: bool,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            path_prefix: String::new(),
            version: DEFAULT_API_VERSION.to_string(),
            ssl_verify: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from environment variables
    ///
    /// - `KRAKEN_API_URL`: base URL
    /// - `KRAKEN_API_VERSION`: API version
    /// - `KRAKEN_SSL_VERIFY`: `false` or `0` disables certificate checks
    /// - `KRAKEN_API_KEY` / `KRAKEN_PRIVATE_KEY`: credentials, if the key is set
    pub fn from_env() -> RestResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("KRAKEN_API_URL") {
            config.base_url = url;
        }
        if let Ok(version) = std::env::var("KRAKEN_API_VERSION") {
            config.version = version;
        }
        if let Ok(verify) = std::env::var("KRAKEN_SSL_VERIFY") {
            config.ssl_verify = !matches!(verify.trim(), "0" | "false" | "no");
        }
        if std::env::var_os(API_KEY_ENV).is_some() {
            config.credentials = Some(Credentials::from_env()?);
        }

        Ok(config)
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the path prefix
    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    /// Set the API version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Enable or disable TLS certificate verification
    pub fn with_ssl_verify(mut self, ssl_verify: bool) -> Self {
        self.ssl_verify = ssl_verify;
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_without_credentials() {
        let client = KrakenRestClient::new().unwrap();
        assert!(!client.has_credentials());
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(60)
            .with_user_agent("test-agent")
            .with_base_url("https://api.beta.kraken.com")
            .with_ssl_verify(false);

        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.base_url, "https://api.beta.kraken.com");
        assert!(!config.ssl_verify);
        assert_eq!(config.version, "0");
    }

    #[test]
    fn test_paths() {
        let config = ClientConfig::new().with_version("1").with_path_prefix("/api");
        let client = KrakenRestClient::with_config(config).unwrap();

        assert_eq!(client.public_path("Ticker"), "/api/1/public/Ticker");
    }

    #[test]
    fn test_auth_required_error() {
        let client = KrakenRestClient::new().unwrap();
        assert!(matches!(client.account(), Err(RestError::AuthRequired)));
        assert!(matches!(client.trading(), Err(RestError::AuthRequired)));
    }

    #[test]
    fn test_debug_hides_credentials() {
        let creds = Credentials::new("API_KEY_123456", "c2VjcmV0").unwrap();
        let client = KrakenRestClient::with_credentials(creds).unwrap();
        let debug = format!("{:?}", client);

        assert!(debug.contains("has_credentials: true"));
        assert!(!debug.contains("c2VjcmV0"));
    }
}
