//! Inline button payloads
//!
//! Wire forms (colon-delimited):
//! - `iv:<interval>`             interval row button
//! - `coin:<symbol>:<interval>`  coin grid button

use crate::errors::PayloadError;
use crate::market_data::Interval;
use serde::{Deserialize, Serialize};

/// Telegram rejects callback data longer than this
pub const MAX_CALLBACK_DATA_BYTES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackPayload {
    IntervalChange { interval: Interval },
    CoinSelect { symbol: String, interval: Interval },
}

impl CallbackPayload {
    pub fn parse(data: &str) -> Result<Self, PayloadError> {
        let parts: Vec<&str> = data.split(':').collect();

        match parts.as_slice() {
            ["iv", interval] => Ok(CallbackPayload::IntervalChange {
                interval: parse_interval(interval)?,
            }),
            ["coin", symbol, interval] => Ok(CallbackPayload::CoinSelect {
                symbol: parse_symbol(symbol)?,
                interval: parse_interval(interval)?,
            }),
            _ => Err(PayloadError::UnknownShape(data.to_string())),
        }
    }

    /// Interval carried by the button
    pub fn interval(&self) -> Interval {
        match self {
            CallbackPayload::IntervalChange { interval } => *interval,
            CallbackPayload::CoinSelect { interval, .. } => *interval,
        }
    }

    pub fn to_callback_data(&self) -> String {
        match self {
            CallbackPayload::IntervalChange { interval } => format!("iv:{}", interval),
            CallbackPayload::CoinSelect { symbol, interval } => {
                format!("coin:{}:{}", symbol, interval)
            }
        }
    }
}

fn parse_interval(raw: &str) -> Result<Interval, PayloadError> {
    Interval::parse(raw).ok_or_else(|| PayloadError::InvalidInterval(raw.to_string()))
}

fn parse_symbol(raw: &str) -> Result<String, PayloadError> {
    let valid = !raw.is_empty()
        && raw.len() <= 20
        && raw.chars().all(|c| c.is_ascii_alphanumeric());
    if valid {
        Ok(raw.to_string())
    } else {
        Err(PayloadError::InvalidSymbol(raw.to_string()))
    }
}

/// What the router does with a payload it cannot parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnparseablePolicy {
    /// Log and drop
    Ignore,
    /// Tell the user and attach a fresh menu
    Notify,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::WATCHLIST;

    #[test]
    fn test_parse_interval_change() {
        assert_eq!(
            CallbackPayload::parse("iv:4h").unwrap(),
            CallbackPayload::IntervalChange {
                interval: Interval::Hour4
            }
        );
    }

    #[test]
    fn test_parse_coin_select() {
        assert_eq!(
            CallbackPayload::parse("coin:BTCUSDT:1h").unwrap(),
            CallbackPayload::CoinSelect {
                symbol: "BTCUSDT".to_string(),
                interval: Interval::Hour1
            }
        );
    }

    #[test]
    fn test_rejects_unknown_shapes() {
        for data in ["", "iv", "iv:", "iv:4h:extra", "coin:BTCUSDT", "menu:main", "coin:BTCUSDT:1h:x"] {
            assert!(CallbackPayload::parse(data).is_err(), "accepted {:?}", data);
        }
        assert!(matches!(
            CallbackPayload::parse("menu:main"),
            Err(PayloadError::UnknownShape(_))
        ));
    }

    #[test]
    fn test_rejects_bad_interval_and_symbol() {
        assert_eq!(
            CallbackPayload::parse("iv:5m"),
            Err(PayloadError::InvalidInterval("5m".to_string()))
        );
        assert_eq!(
            CallbackPayload::parse("coin:btc-usdt:1h"),
            Err(PayloadError::InvalidSymbol("btc-usdt".to_string()))
        );
        assert!(matches!(
            CallbackPayload::parse("coin::1h"),
            Err(PayloadError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn test_encoded_payloads_fit_telegram_limit() {
        for coin in WATCHLIST {
            for interval in Interval::ALL {
                let payload = CallbackPayload::CoinSelect {
                    symbol: coin.symbol.to_string(),
                    interval,
                };
                let data = payload.to_callback_data();
                assert!(data.len() <= MAX_CALLBACK_DATA_BYTES);
                assert_eq!(CallbackPayload::parse(&data).unwrap(), payload);
            }
        }
    }
}
