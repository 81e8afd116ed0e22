//! Types for Kraken REST API requests and responses

use kraken_auth::RequestParams;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Market Data Types
// ============================================================================

/// Server time
#[derive(Debug, Clone, Deserialize)]
pub struct ServerTime {
    /// Unix timestamp
    pub unixtime: u64,
    /// RFC 1123 time format
    pub rfc1123: String,
}

// ============================================================================
// Trading Types
// ============================================================================

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    /// Market order
    Market,
    /// Limit order
    Limit,
    /// Stop loss
    StopLoss,
    /// Take profit
    TakeProfit,
    /// Stop loss with take profit (conditional close only)
    StopLossProfit,
    /// Stop loss limit
    StopLossLimit,
    /// Take profit limit
    TakeProfitLimit,
    /// Trailing stop
    TrailingStop,
    /// Trailing stop limit
    TrailingStopLimit,
    /// Settle position
    SettlePosition,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Market => "market",
            Self::Limit => "limit",
            Self::StopLoss => "stop-loss",
            Self::TakeProfit => "take-profit",
            Self::StopLossProfit => "stop-loss-profit",
            Self::StopLossLimit => "stop-loss-limit",
            Self::TakeProfitLimit => "take-profit-limit",
            Self::TrailingStop => "trailing-stop",
            Self::TrailingStopLimit => "trailing-stop-limit",
            Self::SettlePosition => "settle-position",
        };
        write!(f, "{}", s)
    }
}

/// Order flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFlag {
    /// Post-only order (maker only)
    PostOnly,
    /// Fee in base currency
    FeeInBase,
    /// Fee in quote currency
    FeeInQuote,
    /// Disable market price protection
    NoMarketPriceProtection,
    /// Order volume in quote currency
    VolumeInQuote,
}

impl OrderFlag {
    /// Get the API string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostOnly => "post",
            Self::FeeInBase => "fcib",
            Self::FeeInQuote => "fciq",
            Self::NoMarketPriceProtection => "nompp",
            Self::VolumeInQuote => "viqc",
        }
    }
}

/// Conditional close order attached to a new order
///
/// Prices are kept as text so relative expressions such as `#5%` or `+10`
/// pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseOrder {
    /// Close order type
    pub order_type: OrderType,
    /// Close price
    pub price: String,
    /// Secondary close price
    pub price2: Option<String>,
}

impl CloseOrder {
    /// Create a close order with a single price
    pub fn new(order_type: OrderType, price: impl Into<String>) -> Self {
        Self {
            order_type,
            price: price.into(),
            price2: None,
        }
    }

    /// Set the secondary price
    pub fn with_price2(mut self, price2: impl Into<String>) -> Self {
        self.price2 = Some(price2.into());
        self
    }

    fn to_params(&self) -> RequestParams {
        RequestParams::new()
            .with("ordertype", self.order_type.to_string())
            .with("price", self.price.as_str())
            .with_opt("price2", self.price2.as_deref())
    }
}

/// Request to place an order
#[derive(Debug, Clone)]
pub struct OrderRequest {
    /// Trading pair
    pub pair: String,
    /// Order side
    pub side: OrderSide,
    /// Order type
    pub order_type: OrderType,
    /// Order volume
    pub volume: Decimal,
    /// Price (for limit orders)
    pub price: Option<String>,
    /// Secondary price (for stop-loss-limit, take-profit-limit)
    pub price2: Option<String>,
    /// Leverage (for margin), e.g. `2:1`
    pub leverage: Option<String>,
    /// Order flags
    pub flags: Vec<OrderFlag>,
    /// Start time
    pub starttm: Option<String>,
    /// Expire time
    pub expiretm: Option<String>,
    /// User reference ID
    pub userref: Option<i32>,
    /// Validate only (don't submit)
    pub validate: bool,
    /// Conditional close order
    pub close: Option<CloseOrder>,
}

impl OrderRequest {
    fn base(
        pair: impl Into<String>,
        side: OrderSide,
        order_type: OrderType,
        volume: Decimal,
    ) -> Self {
        Self {
            pair: pair.into(),
            side,
            order_type,
            volume,
            price: None,
            price2: None,
            leverage: None,
            flags: Vec::new(),
            starttm: None,
            expiretm: None,
            userref: None,
            validate: false,
            close: None,
        }
    }

    /// Create a market order
    pub fn market(pair: impl Into<String>, side: OrderSide, volume: Decimal) -> Self {
        Self::base(pair, side, OrderType::Market, volume)
    }

    /// Create a limit order
    pub fn limit(
        pair: impl Into<String>,
        side: OrderSide,
        volume: Decimal,
        price: impl ToString,
    ) -> Self {
        let mut order = Self::base(pair, side, OrderType::Limit, volume);
        order.price = Some(price.to_string());
        order
    }

    /// Create a stop loss order
    pub fn stop_loss(
        pair: impl Into<String>,
        side: OrderSide,
        volume: Decimal,
        stop_price: impl ToString,
    ) -> Self {
        let mut order = Self::base(pair, side, OrderType::StopLoss, volume);
        order.price = Some(stop_price.to_string());
        order
    }

    /// Set the secondary price
    pub fn with_price2(mut self, price2: impl ToString) -> Self {
        self.price2 = Some(price2.to_string());
        self
    }

    /// Add an order flag
    pub fn with_flag(mut self, flag: OrderFlag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Set as post-only (maker only)
    pub fn post_only(self) -> Self {
        self.with_flag(OrderFlag::PostOnly)
    }

    /// Set leverage for margin trading
    pub fn with_leverage(mut self, leverage: impl Into<String>) -> Self {
        self.leverage = Some(leverage.into());
        self
    }

    /// Set the scheduled start time (`0`, `+<n>` or a Unix timestamp)
    pub fn with_start_time(mut self, starttm: impl Into<String>) -> Self {
        self.starttm = Some(starttm.into());
        self
    }

    /// Set the expiry time (`0`, `+<n>` or a Unix timestamp)
    pub fn with_expire_time(mut self, expiretm: impl Into<String>) -> Self {
        self.expiretm = Some(expiretm.into());
        self
    }

    /// Set user reference ID
    pub fn with_userref(mut self, userref: i32) -> Self {
        self.userref = Some(userref);
        self
    }

    /// Set as validate-only (don't actually submit)
    pub fn validate_only(mut self) -> Self {
        self.validate = true;
        self
    }

    /// Attach a conditional close order
    pub fn with_close(mut self, close: CloseOrder) -> Self {
        self.close = Some(close);
        self
    }

    /// Request parameters for `AddOrder`
    pub fn to_params(&self) -> RequestParams {
        let oflags = (!self.flags.is_empty()).then(|| {
            self.flags
                .iter()
                .map(OrderFlag::as_str)
                .collect::<Vec<_>>()
                .join(",")
        });

        let mut params = RequestParams::new()
            .with("pair", self.pair.as_str())
            .with("type", self.side.to_string())
            .with("ordertype", self.order_type.to_string())
            .with("volume", self.volume)
            .with_opt("price", self.price.as_deref())
            .with_opt("price2", self.price2.as_deref())
            .with_opt("leverage", self.leverage.as_deref())
            .with_opt("oflags", oflags)
            .with_opt("starttm", self.starttm.as_deref())
            .with_opt("expiretm", self.expiretm.as_deref())
            .with_opt("userref", self.userref);

        if self.validate {
            params.insert("validate", true);
        }
        if let Some(close) = &self.close {
            params.insert("close", close.to_params());
        }

        params
    }
}

/// Response from placing an order
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    /// Order description
    pub descr: OrderResponseDescription,
    /// Transaction IDs
    pub txid: Option<Vec<String>>,
}

/// Order response description
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponseDescription {
    /// Order description
    pub order: String,
    /// Close order description (if applicable)
    pub close: Option<String>,
}

/// Cancel order result
#[derive(Debug, Clone, Deserialize)]
pub struct CancelOrderResult {
    /// Number of orders cancelled
    pub count: u32,
    /// Whether cancel is pending
    pub pending: Option<bool>,
}
