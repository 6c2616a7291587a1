//! Slash command parsing and dispatch
//!
//! Text messages that are not one of the commands below are ignored.

pub mod callbacks;
pub mod market;
pub mod menu;

pub use callbacks::{CallbackEvent, CallbackOutcome, CallbackRouter};

use crate::logger::{self, LogTag};
use crate::market_data::{Interval, MarketData};
use crate::telegram::state::IntervalStateStore;
use crate::telegram::transport::ChatTransport;
use std::sync::Arc;
use teloxide::types::ChatId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Price(Option<String>),
    Analysis(Option<String>),
    Cryptos,
}

impl Command {
    /// Parse `/name[@bot] [args...]`; `None` for anything else
    pub fn parse(text: &str) -> Option<Command> {
        let mut tokens = text.split_whitespace();
        let head = tokens.next()?.strip_prefix('/')?;
        let name = head.split('@').next().unwrap_or(head);
        let arg = tokens.next().map(str::to_string);

        match name.to_lowercase().as_str() {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "price" => Some(Command::Price(arg)),
            "analysis" => Some(Command::Analysis(arg)),
            "cryptos" => Some(Command::Cryptos),
            _ => None,
        }
    }
}

/// A text message, already past the access guard
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    pub user_id: u64,
    pub chat_id: ChatId,
    pub text: String,
}

pub struct CommandHandler {
    market: Arc<dyn MarketData>,
    store: Arc<IntervalStateStore>,
    transport: Arc<dyn ChatTransport>,
    quote_asset: String,
    default_interval: Interval,
}

impl CommandHandler {
    pub fn new(
        market: Arc<dyn MarketData>,
        store: Arc<IntervalStateStore>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            market,
            store,
            transport,
            quote_asset: "USDT".to_string(),
            default_interval: Interval::Hour1,
        }
    }

    pub fn with_quote_asset(mut self, quote_asset: &str) -> Self {
        self.quote_asset = quote_asset.to_string();
        self
    }

    pub fn with_default_interval(mut self, interval: Interval) -> Self {
        self.default_interval = interval;
        self
    }

    /// Run the command in `event`, if any. Returns what was recognized.
    pub async fn handle(&self, event: &MessageEvent) -> Option<Command> {
        let command = Command::parse(&event.text)?;
        logger::debug(
            LogTag::Telegram,
            &format!("user={} command {:?}", event.user_id, command),
        );

        let result = match &command {
            Command::Start => menu::send_welcome(self.transport.as_ref(), event.chat_id).await,
            Command::Help => menu::send_help(self.transport.as_ref(), event.chat_id).await,
            Command::Cryptos => {
                let interval = self.store.effective(event.user_id, self.default_interval);
                menu::send_cryptos_menu(self.transport.as_ref(), event.chat_id, interval).await
            }
            Command::Price(coin) => {
                let text = market::price_reply(self.market.as_ref(), coin.as_deref(), &self.quote_asset).await;
                self.transport
                    .send_text(event.chat_id, &text, None)
                    .await
                    .map(|_| ())
            }
            Command::Analysis(coin) => {
                let text =
                    market::analysis_reply(self.market.as_ref(), coin.as_deref(), &self.quote_asset).await;
                self.transport
                    .send_text(event.chat_id, &text, None)
                    .await
                    .map(|_| ())
            }
        };

        if let Err(e) = result {
            logger::warning(
                LogTag::Telegram,
                &format!("Reply to {:?} failed: {}", command, e),
            );
        }
        Some(command)
    }
}
