//! Demo: Tour of the REST API
//!
//! Showcases: public market data, signed private queries, order placement
//! with a conditional close
//!
//! Run: cargo run --bin rest_tour
//!
//! Private calls run only when KRAKEN_API_KEY and KRAKEN_PRIVATE_KEY are set.
//! Orders are submitted with `validate=true`, so nothing is actually placed.
//! Set KRAKEN_API_URL=https://api.beta.kraken.com and KRAKEN_SSL_VERIFY=false
//! to point the tour at the beta platform.

use colored::*;
use kraken_rest::{
    ApiResponse, ClientConfig, CloseOrder, KrakenRestClient, OrderFlag, OrderRequest, OrderSide,
    OrderType, RequestParams, RestResult,
};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn section(title: &str) {
    println!();
    println!("{}", "═".repeat(60).cyan());
    println!("  {}", title.cyan().bold());
    println!("{}", "═".repeat(60).cyan());
}

fn report(label: &str, response: RestResult<ApiResponse>) {
    match response {
        Ok(response) if response.is_success() => {
            let pretty = serde_json::to_string_pretty(&response.result).unwrap_or_default();
            let preview: String = pretty.lines().take(12).collect::<Vec<_>>().join("\n");
            println!("{} {}", "✓".green(), label.white().bold());
            println!("{}", preview);
        }
        Ok(response) => {
            println!("{} {} rejected by Kraken:", "✗".yellow(), label.white().bold());
            for error in response.errors() {
                println!("    {:?}: {}", error.category, error.message);
            }
        }
        Err(e) => println!("{} {} failed: {}", "✗".red(), label.white().bold(), e),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::from_env()?;
    let client = KrakenRestClient::with_config(config)?;

    section("PUBLIC MARKET DATA");

    match client.server_time().await {
        Ok(time) => println!("{} Server time: {}", "✓".green(), time.rfc1123),
        Err(e) => println!("{} Server time failed: {}", "✗".red(), e),
    }

    report("Assets", client.assets().await);
    report("Ticker XBTUSD", client.ticker("XBTUSD").await);
    report(
        "Trades XBTEUR",
        client
            .query_public(
                "Trades",
                RequestParams::new()
                    .with("pair", "XBTEUR")
                    .with("since", "137589964200000000"),
            )
            .await,
    );

    if !client.has_credentials() {
        println!();
        println!(
            "{} Set KRAKEN_API_KEY and KRAKEN_PRIVATE_KEY to run the private calls",
            "•".yellow()
        );
        return Ok(());
    }

    section("PRIVATE ACCOUNT");

    report("Balance", client.balance().await);
    report("Open orders (with trades)", client.open_orders(true).await);

    section("ORDERS (validate only)");

    let limit = OrderRequest::limit("XBTUSD", OrderSide::Sell, dec!(1.123), "120").validate_only();
    report("Limit sell", client.trading()?.add_order(&limit).await);

    let market = OrderRequest::market("XBTEUR", OrderSide::Buy, dec!(300))
        .with_flag(OrderFlag::VolumeInQuote)
        .with_start_time("+60")
        .validate_only();
    report("Market buy, volume in quote", client.trading()?.add_order(&market).await);

    let leveraged = OrderRequest::limit("XBTUSD", OrderSide::Buy, dec!(2.12345678), "101.9901")
        .with_leverage("2:1")
        .with_close(CloseOrder::new(OrderType::StopLossProfit, "#5%").with_price2("#10"))
        .validate_only();
    report(
        "Leveraged buy with stop loss / take profit",
        client.trading()?.add_order(&leveraged).await,
    );

    Ok(())
}
