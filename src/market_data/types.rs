// Core types for market data

use serde::{Deserialize, Serialize};
use std::fmt;

/// Candle aggregation periods offered in the chart menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Day1,
}

impl Interval {
    /// Menu order of the interval row
    pub const ALL: [Interval; 4] = [
        Interval::Minute15,
        Interval::Hour1,
        Interval::Hour4,
        Interval::Day1,
    ];

    /// Parse from the wire/API form ("15m", "1h", "4h", "1d")
    pub fn parse(s: &str) -> Option<Interval> {
        match s {
            "15m" => Some(Interval::Minute15),
            "1h" => Some(Interval::Hour1),
            "4h" => Some(Interval::Hour4),
            "1d" => Some(Interval::Day1),
            _ => None,
        }
    }

    /// Exchange API parameter, also used in callback payloads and captions
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute15 => "15m",
            Interval::Hour1 => "1h",
            Interval::Hour4 => "4h",
            Interval::Day1 => "1d",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One OHLCV sample. `timestamp` is the bucket's close time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// All numeric fields finite and volume non-negative
    pub fn is_finite(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite())
            && self.volume >= 0.0
    }
}

/// Candles ordered by ascending timestamp. May be empty.
pub type CandleSeries = Vec<Candle>;

/// 24h ticker statistics
#[derive(Debug, Clone, PartialEq)]
pub struct Ticker {
    pub symbol: String,
    /// Kept as the exchange formats it ("67123.45000000")
    pub last_price: String,
    pub price_change_percent: f64,
}

/// Direction suggested by the 24h change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    Long,
    Short,
}

impl Ticker {
    pub fn recommendation(&self) -> Recommendation {
        if self.price_change_percent > 0.0 {
            Recommendation::Long
        } else {
            Recommendation::Short
        }
    }
}

/// A watchlist coin: button label plus exchange symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinEntry {
    pub label: &'static str,
    pub symbol: &'static str,
}

/// Coins shown in the chart menu, in grid order
pub const WATCHLIST: [CoinEntry; 6] = [
    CoinEntry { label: "BTC", symbol: "BTCUSDT" },
    CoinEntry { label: "ETH", symbol: "ETHUSDT" },
    CoinEntry { label: "XRP", symbol: "XRPUSDT" },
    CoinEntry { label: "SOL", symbol: "SOLUSDT" },
    CoinEntry { label: "BNB", symbol: "BNBUSDT" },
    CoinEntry { label: "ADA", symbol: "ADAUSDT" },
];

/// Turn a user-typed coin ("btc", "ETHUSDT") into an exchange symbol
pub fn resolve_symbol(input: &str, quote_asset: &str) -> String {
    let base = input.trim().to_uppercase();
    let quote = quote_asset.to_uppercase();
    if base.ends_with(&quote) {
        base
    } else {
        format!("{}{}", base, quote)
    }
}
