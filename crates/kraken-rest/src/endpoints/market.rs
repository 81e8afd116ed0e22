//! Public market data endpoints
//!
//! These endpoints don't require authentication.

use kraken_auth::RequestParams;
use tracing::instrument;

use crate::client::KrakenRestClient;
use crate::error::RestResult;
use crate::response::ApiResponse;
use crate::transport::Transport;

/// Public market data endpoints
pub struct MarketEndpoints<'a, T> {
    client: &'a KrakenRestClient<T>,
}

impl<'a, T: Transport> MarketEndpoints<'a, T> {
    pub fn new(client: &'a KrakenRestClient<T>) -> Self {
        Self { client }
    }

    /// Get server time
    #[instrument(skip(self))]
    pub async fn server_time(&self) -> RestResult<ApiResponse> {
        self.client.query_public("Time", RequestParams::new()).await
    }

    /// Get asset info
    ///
    /// # Arguments
    /// * `assets` - Optional list of assets to get info for (e.g., ["XBT", "ETH"])
    #[instrument(skip(self))]
    pub async fn assets(&self, assets: Option<&[&str]>) -> RestResult<ApiResponse> {
        let params = RequestParams::new().with_opt("asset", assets.map(|a| a.join(",")));
        self.client.query_public("Assets", params).await
    }

    /// Get tradable asset pairs
    #[instrument(skip(self))]
    pub async fn asset_pairs(&self, pairs: Option<&[&str]>) -> RestResult<ApiResponse> {
        let params = RequestParams::new().with_opt("pair", pairs.map(|p| p.join(",")));
        self.client.query_public("AssetPairs", params).await
    }

    /// Get ticker information
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g., "XBTUSD"); several pairs comma separated
    #[instrument(skip(self))]
    pub async fn ticker(&self, pair: &str) -> RestResult<ApiResponse> {
        let params = RequestParams::new().with("pair", pair);
        self.client.query_public("Ticker", params).await
    }

    /// Get order book
    ///
    /// # Arguments
    /// * `pair` - Trading pair
    /// * `count` - Maximum number of asks/bids
    #[instrument(skip(self))]
    pub async fn depth(&self, pair: &str, count: Option<u32>) -> RestResult<ApiResponse> {
        let params = RequestParams::new().with("pair", pair).with_opt("count", count);
        self.client.query_public("Depth", params).await
    }

    /// Get recent trades
    ///
    /// # Arguments
    /// * `pair` - Trading pair
    /// * `since` - Cursor; pass the `last` value of a previous result
    #[instrument(skip(self))]
    pub async fn trades(&self, pair: &str, since: Option<&str>) -> RestResult<ApiResponse> {
        let params = RequestParams::new().with("pair", pair).with_opt("since", since);
        self.client.query_public("Trades", params).await
    }
}
