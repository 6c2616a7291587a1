//! Exchange market data: domain types and the public REST client

pub mod client;
pub mod types;

pub use client::{parse_klines, parse_ticker, MarketData, MarketDataClient};
pub use types::{
    resolve_symbol, Candle, CandleSeries, CoinEntry, Interval, Recommendation, Ticker, WATCHLIST,
};
