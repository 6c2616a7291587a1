//! /price and /analysis

use crate::logger::{self, LogTag};
use crate::market_data::{resolve_symbol, MarketData};
use crate::telegram::formatters;

/// Reply text for `/price <coin>`
pub async fn price_reply(market: &dyn MarketData, coin: Option<&str>, quote_asset: &str) -> String {
    let Some(coin) = coin else {
        return formatters::PRICE_USAGE.to_string();
    };

    let symbol = resolve_symbol(coin, quote_asset);
    match market.get_ticker(&symbol).await {
        Ok(ticker) => formatters::format_price(&ticker, quote_asset),
        Err(e) => {
            logger::warning(LogTag::MarketData, &format!("Price for {} failed: {}", symbol, e));
            formatters::format_error(&e)
        }
    }
}

/// Reply text for `/analysis <coin>`: direction of the last 24h
pub async fn analysis_reply(
    market: &dyn MarketData,
    coin: Option<&str>,
    quote_asset: &str,
) -> String {
    let Some(coin) = coin else {
        return formatters::ANALYSIS_USAGE.to_string();
    };

    let symbol = resolve_symbol(coin, quote_asset);
    match market.get_ticker(&symbol).await {
        Ok(ticker) => formatters::format_analysis(&ticker),
        Err(e) => {
            logger::warning(
                LogTag::MarketData,
                &format!("Analysis for {} failed: {}", symbol, e),
            );
            formatters::format_error(&e)
        }
    }
}
