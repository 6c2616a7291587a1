// Exchange public REST API client (ticker stats and klines)

use crate::errors::{MarketDataError, MarketDataResult};
use crate::logger::{self, LogTag};
use crate::market_data::types::{Candle, CandleSeries, Interval, Ticker};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};

const TICKER_PATH: &str = "/api/v3/ticker/24hr";
const KLINES_PATH: &str = "/api/v3/klines";

/// Error bodies are cut to this many characters before they reach logs or users
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Kline row layout: [open_time, open, high, low, close, volume, close_time, ...]
const KLINE_MIN_COLUMNS: usize = 7;
const KLINE_CLOSE_TIME_COLUMN: usize = 6;

/// Read-only market data used by the command handlers and the callback router
#[async_trait]
pub trait MarketData: Send + Sync {
    /// 24h ticker statistics for one symbol
    async fn get_ticker(&self, symbol: &str) -> MarketDataResult<Ticker>;

    /// Up to `limit` most recent candles. An empty series is `Ok`.
    async fn get_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: u32,
    ) -> MarketDataResult<CandleSeries>;
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TickerResponse {
    symbol: String,
    last_price: String,
    price_change_percent: String,
}

pub struct MarketDataClient {
    client: Client,
    base_url: String,
    ticker_timeout: Duration,
    klines_timeout: Duration,
}

impl MarketDataClient {
    pub fn new(
        base_url: &str,
        ticker_timeout_secs: u64,
        klines_timeout_secs: u64,
    ) -> Result<Self, String> {
        let client = Client::builder()
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            ticker_timeout: Duration::from_secs(ticker_timeout_secs),
            klines_timeout: Duration::from_secs(klines_timeout_secs),
        })
    }

    /// Create a client from the `[market_data]` config section
    pub fn from_config() -> Result<Self, String> {
        let cfg = crate::config::with_config(|c| c.market_data.clone());
        Self::new(&cfg.base_url, cfg.ticker_timeout_secs, cfg.klines_timeout_secs)
    }

    /// GET `path` with `query`, returning the body of a 2xx response
    async fn get_body(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> MarketDataResult<String> {
        let url = format!("{}{}", self.base_url, path);
        let timeout_secs = timeout.as_secs();
        let start = Instant::now();

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("Accept", "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| MarketDataError::from_reqwest(path, timeout_secs, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MarketDataError::from_reqwest(path, timeout_secs, e))?;

        logger::debug(
            LogTag::MarketData,
            &format!(
                "GET {} -> {} in {}ms ({} bytes)",
                path,
                status.as_u16(),
                start.elapsed().as_millis(),
                body.len()
            ),
        );

        if !status.is_success() {
            return Err(MarketDataError::HttpStatus {
                endpoint: path.to_string(),
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl MarketData for MarketDataClient {
    async fn get_ticker(&self, symbol: &str) -> MarketDataResult<Ticker> {
        let body = self
            .get_body(
                TICKER_PATH,
                &[("symbol", symbol.to_string())],
                self.ticker_timeout,
            )
            .await?;

        parse_ticker(&body)
    }

    async fn get_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: u32,
    ) -> MarketDataResult<CandleSeries> {
        let body = self
            .get_body(
                KLINES_PATH,
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", interval.as_str().to_string()),
                    ("limit", limit.to_string()),
                ],
                self.klines_timeout,
            )
            .await?;

        let raw: Value = serde_json::from_str(&body)
            .map_err(|e| MarketDataError::parse("klines", e.to_string()))?;
        let series = parse_klines(&raw)?;

        logger::debug(
            LogTag::MarketData,
            &format!("{} {}: {} candles", symbol, interval, series.len()),
        );

        Ok(series)
    }
}

pub fn parse_ticker(body: &str) -> MarketDataResult<Ticker> {
    let raw: TickerResponse =
        serde_json::from_str(body).map_err(|e| MarketDataError::parse("ticker", e.to_string()))?;

    let price_change_percent = raw.price_change_percent.parse::<f64>().map_err(|e| {
        MarketDataError::parse(
            "ticker",
            format!("priceChangePercent {:?}: {}", raw.price_change_percent, e),
        )
    })?;

    Ok(Ticker {
        symbol: raw.symbol,
        last_price: raw.last_price,
        price_change_percent,
    })
}

/// Map a klines response into an ascending series
///
/// A JSON array with no rows is a valid, empty series. Anything that is not
/// an array, or any malformed row, is a parse error.
pub fn parse_klines(raw: &Value) -> MarketDataResult<CandleSeries> {
    let rows = raw
        .as_array()
        .ok_or_else(|| MarketDataError::parse("klines", "expected a JSON array"))?;

    let mut series = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let columns = row.as_array().ok_or_else(|| {
                MarketDataError::parse("klines", format!("row {} is not an array", i))
            })?;
            Candle::try_from(columns.as_slice())
                .map_err(|reason| MarketDataError::parse("klines", format!("row {}: {}", i, reason)))
        })
        .collect::<MarketDataResult<CandleSeries>>()?;

    series.sort_by_key(|c| c.timestamp);
    Ok(series)
}

/// Numeric coercion: the exchange sends prices as strings, times as integers
fn coerce_f64(value: &Value, column: &str) -> Result<f64, String> {
    let parsed = match value {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{} is not a finite number: {}", column, value))
}

impl TryFrom<&[Value]> for Candle {
    type Error = String;

    fn try_from(columns: &[Value]) -> Result<Self, Self::Error> {
        if columns.len() < KLINE_MIN_COLUMNS {
            return Err(format!(
                "expected at least {} columns, got {}",
                KLINE_MIN_COLUMNS,
                columns.len()
            ));
        }

        let timestamp = columns[KLINE_CLOSE_TIME_COLUMN]
            .as_i64()
            .ok_or_else(|| format!("close_time is not an integer: {}", columns[6]))?;

        let candle = Candle {
            timestamp,
            open: coerce_f64(&columns[1], "open")?,
            high: coerce_f64(&columns[2], "high")?,
            low: coerce_f64(&columns[3], "low")?,
            close: coerce_f64(&columns[4], "close")?,
            volume: coerce_f64(&columns[5], "volume")?,
        };

        if candle.volume < 0.0 {
            return Err(format!("negative volume {}", candle.volume));
        }

        Ok(candle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn kline_row(open_time: i64, o: &str, h: &str, l: &str, c: &str, v: &str) -> Value {
        json!([
            open_time, o, h, l, c, v,
            open_time + 3_599_999, "0", 10, "0", "0", "0"
        ])
    }

    /// Serve exactly one canned HTTP response on a local port
    async fn serve_once(status_line: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    /// Accept a connection and never answer
    async fn serve_silence() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_parse_klines_uses_close_time() {
        let raw = json!([
            kline_row(1_700_000_000_000, "100.0", "110.0", "95.0", "105.0", "12.5"),
            kline_row(1_700_003_600_000, "105.0", "108.0", "101.0", "102.0", "8"),
        ]);

        let series = parse_klines(&raw).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timestamp, 1_700_003_599_999);
        assert_eq!(series[0].open, 100.0);
        assert_eq!(series[0].high, 110.0);
        assert_eq!(series[0].low, 95.0);
        assert_eq!(series[0].close, 105.0);
        assert_eq!(series[0].volume, 12.5);
        assert!(!series[1].is_bullish());
    }

    #[test]
    fn test_parse_klines_sorts_ascending() {
        let raw = json!([
            kline_row(2_000, "1", "1", "1", "1", "1"),
            kline_row(1_000, "1", "1", "1", "1", "1"),
        ]);
        let series = parse_klines(&raw).unwrap();
        assert!(series[0].timestamp < series[1].timestamp);
    }

    #[test]
    fn test_parse_klines_empty_array_is_empty_series() {
        assert!(parse_klines(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_parse_klines_rejects_non_array() {
        let err = parse_klines(&json!({"code": -1121, "msg": "Invalid symbol."})).unwrap_err();
        assert!(matches!(err, MarketDataError::Parse { .. }));
    }

    #[test]
    fn test_parse_klines_rejects_short_or_bad_rows() {
        assert!(parse_klines(&json!([[1, "1", "1"]])).is_err());
        let bad = json!([kline_row(1, "abc", "1", "1", "1", "1")]);
        assert!(parse_klines(&bad).is_err());
        let negative = json!([kline_row(1, "1", "1", "1", "1", "-3")]);
        assert!(parse_klines(&negative).is_err());
    }

    #[test]
    fn test_parse_ticker() {
        let ticker = parse_ticker(
            r#"{"symbol":"BTCUSDT","priceChange":"-94.99","priceChangePercent":"-0.146","lastPrice":"64850.01000000","volume":"1"}"#,
        )
        .unwrap();
        assert_eq!(ticker.symbol, "BTCUSDT");
        assert_eq!(ticker.last_price, "64850.01000000");
        assert!((ticker.price_change_percent + 0.146).abs() < 1e-9);
    }

    #[test]
    fn test_parse_ticker_rejects_missing_fields() {
        assert!(parse_ticker(r#"{"symbol":"BTCUSDT"}"#).is_err());
    }

    #[tokio::test]
    async fn test_get_candles_over_http() {
        let body = json!([kline_row(1_000, "1.0", "2.0", "0.5", "1.5", "10")]).to_string();
        let base = serve_once("200 OK", body).await;
        let client = MarketDataClient::new(&base, 5, 5).unwrap();

        let series = client
            .get_candles("BTCUSDT", Interval::Hour4, 200)
            .await
            .unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].close, 1.5);
    }

    #[tokio::test]
    async fn test_get_candles_empty_upstream_is_ok_and_empty() {
        let base = serve_once("200 OK", "[]".to_string()).await;
        let client = MarketDataClient::new(&base, 5, 5).unwrap();

        let series = client
            .get_candles("BTCUSDT", Interval::Day1, 200)
            .await
            .unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn test_http_status_is_reported() {
        let base = serve_once(
            "400 Bad Request",
            r#"{"code":-1121,"msg":"Invalid symbol."}"#.to_string(),
        )
        .await;
        let client = MarketDataClient::new(&base, 5, 5).unwrap();

        let err = client.get_ticker("NOPEUSDT").await.unwrap_err();
        match err {
            MarketDataError::HttpStatus { status, body, .. } => {
                assert_eq!(status, 400);
                assert!(body.contains("Invalid symbol"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let base = serve_silence().await;
        let client = MarketDataClient::new(&base, 1, 1).unwrap();

        let err = client
            .get_candles("BTCUSDT", Interval::Hour1, 200)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketDataError::Timeout { timeout_secs: 1, .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = MarketDataClient::new(&format!("http://{}", addr), 2, 2).unwrap();
        let err = client.get_ticker("BTCUSDT").await.unwrap_err();
        assert!(matches!(err, MarketDataError::Network(_)));
    }
}
