//! User-facing message texts (plain text, no parse mode)

use crate::market_data::{Interval, Recommendation, Ticker};

pub const WELCOME_TEXT: &str = "Welcome to the Crypto Analysis Bot!\n\
/price BTC → current price\n\
/analysis BTC → simple analysis\n\
/cryptos → chart menu for popular coins";

pub const HELP_TEXT: &str = "/price <coin> → e.g. /price BTC\n\
/analysis <coin> → e.g. /analysis ETH\n\
/cryptos → quick access to 6 popular coins with charts";

pub const CRYPTOS_MENU_TEXT: &str = "Cryptos:";
pub const PRICE_USAGE: &str = "Usage: /price BTC";
pub const ANALYSIS_USAGE: &str = "Usage: /analysis BTC";
pub const GENERIC_ERROR_TEXT: &str = "An error occurred. Please try /cryptos again.";
pub const UNKNOWN_ACTION_TEXT: &str = "Unknown action. Please try /cryptos again.";

pub fn format_price(ticker: &Ticker, quote_asset: &str) -> String {
    format!("{} price: {} {}", ticker.symbol, ticker.last_price, quote_asset)
}

pub fn format_analysis(ticker: &Ticker) -> String {
    let pct = ticker.price_change_percent;
    match ticker.recommendation() {
        Recommendation::Long => format!(
            "{} recommendation: Long ✅ (last 24h {:.2}%)",
            ticker.symbol, pct
        ),
        Recommendation::Short => format!(
            "{} recommendation: Short ⚠️ (last 24h {:.2}%)",
            ticker.symbol, pct
        ),
    }
}

pub fn format_error(cause: &impl std::fmt::Display) -> String {
    format!("Error: {}", cause)
}

pub fn format_chart_preparing(symbol: &str, interval: Interval) -> String {
    format!("{} {} chart is being prepared...", symbol, interval)
}

pub fn format_chart_caption(symbol: &str, interval: Interval) -> String {
    format!("{} {} chart", symbol, interval)
}

pub fn format_chart_failure(symbol: &str, interval: Interval) -> String {
    format!("Failed to fetch {} {} chart.", symbol, interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(pct: f64) -> Ticker {
        Ticker {
            symbol: "ETHUSDT".to_string(),
            last_price: "3150.12000000".to_string(),
            price_change_percent: pct,
        }
    }

    #[test]
    fn test_price_keeps_exchange_formatting() {
        assert_eq!(
            format_price(&ticker(0.0), "USDT"),
            "ETHUSDT price: 3150.12000000 USDT"
        );
    }

    #[test]
    fn test_price_suffix_follows_quote_asset() {
        let mut eur = ticker(0.0);
        eur.symbol = "ETHEUR".to_string();
        assert_eq!(
            format_price(&eur, "EUR"),
            "ETHEUR price: 3150.12000000 EUR"
        );
    }

    #[test]
    fn test_analysis_direction() {
        assert_eq!(
            format_analysis(&ticker(2.345)),
            "ETHUSDT recommendation: Long ✅ (last 24h 2.35%)"
        );
        assert_eq!(
            format_analysis(&ticker(-0.5)),
            "ETHUSDT recommendation: Short ⚠️ (last 24h -0.50%)"
        );
        assert_eq!(
            format_analysis(&ticker(0.0)),
            "ETHUSDT recommendation: Short ⚠️ (last 24h 0.00%)"
        );
    }

    #[test]
    fn test_chart_texts() {
        assert_eq!(
            format_chart_caption("BTCUSDT", Interval::Hour4),
            "BTCUSDT 4h chart"
        );
        assert_eq!(
            format_chart_failure("BTCUSDT", Interval::Hour4),
            "Failed to fetch BTCUSDT 4h chart."
        );
        assert_eq!(
            format_chart_preparing("SOLUSDT", Interval::Minute15),
            "SOLUSDT 15m chart is being prepared..."
        );
    }
}
