//! Callback query routing for the chart menu
//!
//! Every button press goes through the same path:
//!
//! ```text
//! Received → Classified → IntervalBranch | CoinBranch → Dispatched
//!                                                     ↘ Failed
//! ```
//!
//! The query is answered before anything else happens. Branch faults end in
//! a best-effort error notice and never escape [`CallbackRouter::handle`].

use crate::chart::ChartRenderer;
use crate::errors::RouterError;
use crate::logger::{self, LogTag};
use crate::market_data::{Interval, MarketData};
use crate::telegram::formatters;
use crate::telegram::keyboards::chart_menu;
use crate::telegram::payload::{CallbackPayload, UnparseablePolicy};
use crate::telegram::state::IntervalStateStore;
use crate::telegram::transport::ChatTransport;
use std::sync::Arc;
use teloxide::types::{ChatId, MessageId};

const DEFAULT_CANDLE_LIMIT: u32 = 200;

/// A button press, already past the access guard
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackEvent {
    pub query_id: String,
    pub user_id: u64,
    pub chat_id: ChatId,
    /// Message carrying the pressed keyboard; absent when Telegram no longer exposes it
    pub message_id: Option<MessageId>,
    pub data: String,
}

/// How an event ended
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    IntervalChanged { interval: Interval },
    ChartSent { symbol: String, interval: Interval },
    ChartUnavailable { symbol: String, interval: Interval },
    Unparseable { notified: bool },
    Failed,
}

pub struct CallbackRouter {
    market: Arc<dyn MarketData>,
    store: Arc<IntervalStateStore>,
    renderer: ChartRenderer,
    transport: Arc<dyn ChatTransport>,
    candle_limit: u32,
    default_interval: Interval,
    unparseable: UnparseablePolicy,
}

impl CallbackRouter {
    pub fn new(
        market: Arc<dyn MarketData>,
        store: Arc<IntervalStateStore>,
        renderer: ChartRenderer,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            market,
            store,
            renderer,
            transport,
            candle_limit: DEFAULT_CANDLE_LIMIT,
            default_interval: Interval::Hour1,
            unparseable: UnparseablePolicy::Ignore,
        }
    }

    pub fn with_candle_limit(mut self, limit: u32) -> Self {
        self.candle_limit = limit;
        self
    }

    /// Interval of keyboards sent when the event itself carries none
    pub fn with_default_interval(mut self, interval: Interval) -> Self {
        self.default_interval = interval;
        self
    }

    pub fn with_unparseable_policy(mut self, policy: UnparseablePolicy) -> Self {
        self.unparseable = policy;
        self
    }

    pub fn store(&self) -> &Arc<IntervalStateStore> {
        &self.store
    }

    /// Process one button press to completion. Never fails.
    pub async fn handle(&self, event: &CallbackEvent) -> CallbackOutcome {
        if let Err(e) = self.transport.answer_callback(&event.query_id, None).await {
            logger::warning(
                LogTag::Callback,
                &format!("Could not answer callback {}: {}", event.query_id, e),
            );
        }

        let payload = match CallbackPayload::parse(&event.data) {
            Ok(payload) => payload,
            Err(e) => return self.handle_unparseable(event, e.to_string()).await,
        };

        logger::debug(
            LogTag::Callback,
            &format!("user={} classified {:?}", event.user_id, payload),
        );

        let requested = payload.interval();
        let result = match payload {
            CallbackPayload::IntervalChange { interval } => {
                self.interval_branch(event, interval).await
            }
            CallbackPayload::CoinSelect { symbol, interval } => {
                self.coin_branch(event, &symbol, interval).await
            }
        };

        match result {
            Ok(outcome) => {
                logger::debug(
                    LogTag::Callback,
                    &format!("user={} dispatched: {:?}", event.user_id, outcome),
                );
                outcome
            }
            Err(e) => {
                logger::error(
                    LogTag::Callback,
                    &format!(
                        "user={} callback {:?} failed: {}",
                        event.user_id, event.data, e
                    ),
                );
                self.recover(event, requested).await;
                CallbackOutcome::Failed
            }
        }
    }

    async fn handle_unparseable(&self, event: &CallbackEvent, reason: String) -> CallbackOutcome {
        logger::warning(
            LogTag::Callback,
            &format!("user={} sent unparseable callback: {}", event.user_id, reason),
        );

        match self.unparseable {
            UnparseablePolicy::Ignore => CallbackOutcome::Unparseable { notified: false },
            UnparseablePolicy::Notify => {
                let keyboard = chart_menu(self.effective_interval(event.user_id, self.default_interval));
                if let Err(e) = self
                    .transport
                    .send_text(event.chat_id, formatters::UNKNOWN_ACTION_TEXT, Some(keyboard))
                    .await
                {
                    logger::warning(
                        LogTag::Callback,
                        &format!("Could not notify user={}: {}", event.user_id, e),
                    );
                }
                CallbackOutcome::Unparseable { notified: true }
            }
        }
    }

    /// Store the choice and redraw the keyboard in place
    async fn interval_branch(
        &self,
        event: &CallbackEvent,
        interval: Interval,
    ) -> Result<CallbackOutcome, RouterError> {
        self.store.set(event.user_id, interval);

        let message_id = event.message_id.ok_or(RouterError::MissingMessage)?;
        self.transport
            .edit_keyboard(event.chat_id, message_id, chart_menu(interval))
            .await?;

        Ok(CallbackOutcome::IntervalChanged { interval })
    }

    /// Fetch, render and send a chart at the user's effective interval
    async fn coin_branch(
        &self,
        event: &CallbackEvent,
        symbol: &str,
        embedded: Interval,
    ) -> Result<CallbackOutcome, RouterError> {
        let interval = self.effective_interval(event.user_id, embedded);

        if let Some(message_id) = event.message_id {
            let placeholder = formatters::format_chart_preparing(symbol, interval);
            if let Err(e) = self
                .transport
                .edit_text(event.chat_id, message_id, &placeholder, None)
                .await
            {
                logger::debug(
                    LogTag::Callback,
                    &format!("Placeholder edit skipped: {}", e),
                );
            }
        }

        let series = match self
            .market
            .get_candles(symbol, interval, self.candle_limit)
            .await
        {
            Ok(series) => series,
            Err(e) => {
                logger::warning(
                    LogTag::MarketData,
                    &format!("Candles for {} {} unavailable: {}", symbol, interval, e),
                );
                Vec::new()
            }
        };

        let png = if series.is_empty() {
            None
        } else {
            self.renderer.render_blocking(series).await?
        };

        let keyboard = chart_menu(interval);
        match png {
            Some(png) => {
                let caption = formatters::format_chart_caption(symbol, interval);
                self.transport
                    .send_photo(event.chat_id, png, &caption, keyboard)
                    .await?;
                Ok(CallbackOutcome::ChartSent {
                    symbol: symbol.to_string(),
                    interval,
                })
            }
            None => {
                let text = formatters::format_chart_failure(symbol, interval);
                self.transport
                    .send_text(event.chat_id, &text, Some(keyboard))
                    .await?;
                Ok(CallbackOutcome::ChartUnavailable {
                    symbol: symbol.to_string(),
                    interval,
                })
            }
        }
    }

    /// Edit the originating message into an error notice, else send one
    async fn recover(&self, event: &CallbackEvent, requested: Interval) {
        let keyboard = chart_menu(self.effective_interval(event.user_id, requested));

        if let Some(message_id) = event.message_id {
            match self
                .transport
                .edit_text(
                    event.chat_id,
                    message_id,
                    formatters::GENERIC_ERROR_TEXT,
                    Some(keyboard.clone()),
                )
                .await
            {
                Ok(()) => return,
                Err(e) => logger::debug(
                    LogTag::Callback,
                    &format!("Error notice edit failed, sending instead: {}", e),
                ),
            }
        }

        if let Err(e) = self
            .transport
            .send_text(event.chat_id, formatters::GENERIC_ERROR_TEXT, Some(keyboard))
            .await
        {
            logger::error(
                LogTag::Callback,
                &format!("Could not deliver error notice to user={}: {}", event.user_id, e),
            );
        }
    }

    fn effective_interval(&self, user_id: u64, fallback: Interval) -> Interval {
        self.store.effective(user_id, fallback)
    }
}
