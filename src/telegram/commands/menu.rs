//! /start, /help and the /cryptos chart menu

use crate::errors::TransportResult;
use crate::market_data::Interval;
use crate::telegram::formatters;
use crate::telegram::keyboards;
use crate::telegram::transport::ChatTransport;
use teloxide::types::ChatId;

pub async fn send_welcome(transport: &dyn ChatTransport, chat_id: ChatId) -> TransportResult<()> {
    transport
        .send_text(chat_id, formatters::WELCOME_TEXT, None)
        .await
        .map(|_| ())
}

pub async fn send_help(transport: &dyn ChatTransport, chat_id: ChatId) -> TransportResult<()> {
    transport
        .send_text(chat_id, formatters::HELP_TEXT, None)
        .await
        .map(|_| ())
}

/// Open the chart menu with `interval` marked
pub async fn send_cryptos_menu(
    transport: &dyn ChatTransport,
    chat_id: ChatId,
    interval: Interval,
) -> TransportResult<()> {
    transport
        .send_text(
            chat_id,
            formatters::CRYPTOS_MENU_TEXT,
            Some(keyboards::chart_menu(interval)),
        )
        .await
        .map(|_| ())
}
