//! In-memory doubles for handler tests

use crate::errors::{MarketDataError, MarketDataResult, TransportError, TransportResult};
use crate::market_data::{Candle, CandleSeries, Interval, MarketData, Ticker};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use teloxide::types::{ChatId, InlineKeyboardMarkup, MessageId};

#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    AnswerCallback {
        query_id: String,
        alert: Option<String>,
    },
    SendText {
        chat_id: ChatId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    EditText {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    EditKeyboard {
        chat_id: ChatId,
        message_id: MessageId,
        keyboard: InlineKeyboardMarkup,
    },
    SendPhoto {
        chat_id: ChatId,
        png: Vec<u8>,
        caption: String,
        keyboard: InlineKeyboardMarkup,
    },
}

/// Records every call; operations named in `failing` return an error
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<TransportCall>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, operation: &'static str) {
        self.failing.lock().insert(operation);
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().clone()
    }

    fn record(&self, operation: &'static str, call: TransportCall) -> TransportResult<()> {
        self.calls.lock().push(call);
        if self.failing.lock().contains(operation) {
            Err(TransportError::new(operation, "scripted failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl crate::telegram::transport::ChatTransport for RecordingTransport {
    async fn answer_callback(&self, query_id: &str, alert: Option<&str>) -> TransportResult<()> {
        self.record(
            "answerCallbackQuery",
            TransportCall::AnswerCallback {
                query_id: query_id.to_string(),
                alert: alert.map(str::to_string),
            },
        )
    }

    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> TransportResult<MessageId> {
        self.record(
            "sendMessage",
            TransportCall::SendText {
                chat_id,
                text: text.to_string(),
                keyboard,
            },
        )?;
        Ok(MessageId(1000))
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> TransportResult<()> {
        self.record(
            "editMessageText",
            TransportCall::EditText {
                chat_id,
                message_id,
                text: text.to_string(),
                keyboard,
            },
        )
    }

    async fn edit_keyboard(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        keyboard: InlineKeyboardMarkup,
    ) -> TransportResult<()> {
        self.record(
            "editMessageReplyMarkup",
            TransportCall::EditKeyboard {
                chat_id,
                message_id,
                keyboard,
            },
        )
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        png: Vec<u8>,
        caption: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> TransportResult<MessageId> {
        self.record(
            "sendPhoto",
            TransportCall::SendPhoto {
                chat_id,
                png,
                caption: caption.to_string(),
                keyboard,
            },
        )?;
        Ok(MessageId(1001))
    }
}

/// Serves fixed answers and remembers what was asked
pub struct ScriptedMarketData {
    ticker: MarketDataResult<Ticker>,
    candles: MarketDataResult<CandleSeries>,
    candle_requests: Mutex<Vec<(String, Interval, u32)>>,
    ticker_requests: Mutex<Vec<String>>,
}

impl ScriptedMarketData {
    pub fn with_candles(candles: MarketDataResult<CandleSeries>) -> Self {
        Self {
            ticker: Err(MarketDataError::Network("no ticker scripted".to_string())),
            candles,
            candle_requests: Mutex::new(Vec::new()),
            ticker_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_ticker(ticker: MarketDataResult<Ticker>) -> Self {
        Self {
            ticker,
            ..Self::with_candles(Ok(Vec::new()))
        }
    }

    pub fn candle_requests(&self) -> Vec<(String, Interval, u32)> {
        self.candle_requests.lock().clone()
    }

    pub fn ticker_requests(&self) -> Vec<String> {
        self.ticker_requests.lock().clone()
    }
}

#[async_trait]
impl MarketData for ScriptedMarketData {
    async fn get_ticker(&self, symbol: &str) -> MarketDataResult<Ticker> {
        self.ticker_requests.lock().push(symbol.to_string());
        self.ticker.clone().map(|mut ticker| {
            ticker.symbol = symbol.to_string();
            ticker
        })
    }

    async fn get_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: u32,
    ) -> MarketDataResult<CandleSeries> {
        self.candle_requests
            .lock()
            .push((symbol.to_string(), interval, limit));
        self.candles.clone()
    }
}

/// A short rising series
pub fn sample_candles(count: usize) -> CandleSeries {
    (0..count)
        .map(|i| {
            let base = 100.0 + i as f64;
            Candle::new(
                1_700_000_000_000 + i as i64 * 3_600_000,
                base,
                base + 2.0,
                base - 1.0,
                base + 1.0,
                10.0 + i as f64,
            )
        })
        .collect()
}
