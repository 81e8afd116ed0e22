//! Private account endpoints
//!
//! These endpoints require authentication.

use kraken_auth::RequestParams;
use tracing::instrument;

use crate::client::KrakenRestClient;
use crate::error::RestResult;
use crate::response::ApiResponse;
use crate::transport::Transport;

/// Private account endpoints
pub struct AccountEndpoints<'a, T> {
    client: &'a KrakenRestClient<T>,
}

impl<'a, T: Transport> AccountEndpoints<'a, T> {
    pub fn new(client: &'a KrakenRestClient<T>) -> Self {
        Self { client }
    }

    /// Get account balance
    #[instrument(skip(self))]
    pub async fn balance(&self) -> RestResult<ApiResponse> {
        self.client.query_private("Balance", RequestParams::new()).await
    }

    /// Get trade balance (margin info)
    ///
    /// # Arguments
    /// * `asset` - Base asset for calculations (default: "ZUSD")
    #[instrument(skip(self))]
    pub async fn trade_balance(&self, asset: Option<&str>) -> RestResult<ApiResponse> {
        let params = RequestParams::new().with_opt("asset", asset);
        self.client.query_private("TradeBalance", params).await
    }

    /// Get open orders
    ///
    /// # Arguments
    /// * `trades` - Include trades related to each order
    #[instrument(skip(self))]
    pub async fn open_orders(&self, trades: bool) -> RestResult<ApiResponse> {
        let params = RequestParams::new().with("trades", trades);
        self.client.query_private("OpenOrders", params).await
    }

    /// Query specific orders
    ///
    /// # Arguments
    /// * `txids` - Transaction IDs (max 50)
    /// * `trades` - Include related trades
    #[instrument(skip(self))]
    pub async fn query_orders(&self, txids: &[&str], trades: bool) -> RestResult<ApiResponse> {
        let params = RequestParams::new()
            .with("txid", txids.join(","))
            .with("trades", trades);
        self.client.query_private("QueryOrders", params).await
    }
}
