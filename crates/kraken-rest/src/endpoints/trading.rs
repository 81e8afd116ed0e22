//! Trading endpoints for order management
//!
//! These endpoints require authentication.

use kraken_auth::RequestParams;
use tracing::{debug, instrument};

use crate::client::KrakenRestClient;
use crate::error::RestResult;
use crate::response::ApiResponse;
use crate::transport::Transport;
use crate::types::OrderRequest;

/// Trading endpoints for order management
pub struct TradingEndpoints<'a, T> {
    client: &'a KrakenRestClient<T>,
}

impl<'a, T: Transport> TradingEndpoints<'a, T> {
    pub fn new(client: &'a KrakenRestClient<T>) -> Self {
        Self { client }
    }

    /// Add a new order
    ///
    /// # Arguments
    /// * `order` - Order request with all parameters
    #[instrument(
        skip(self, order),
        fields(pair = %order.pair, side = ?order.side, order_type = ?order.order_type)
    )]
    pub async fn add_order(&self, order: &OrderRequest) -> RestResult<ApiResponse> {
        debug!(
            "Placing {} {} order for {} {}",
            order.side, order.order_type, order.volume, order.pair
        );

        self.client.query_private("AddOrder", order.to_params()).await
    }

    /// Cancel an order
    ///
    /// # Arguments
    /// * `txid` - Transaction ID or user reference
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, txid: &str) -> RestResult<ApiResponse> {
        let params = RequestParams::new().with("txid", txid);
        self.client.query_private("CancelOrder", params).await
    }

    /// Cancel all open orders
    #[instrument(skip(self))]
    pub async fn cancel_all_orders(&self) -> RestResult<ApiResponse> {
        self.client.query_private("CancelAll", RequestParams::new()).await
    }
}
