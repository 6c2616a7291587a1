//! Outbound chat API calls
//!
//! Handlers talk to Telegram only through [`ChatTransport`], so the router
//! can be driven by a recording double in tests. Every call is fallible and
//! none of them retries.

use crate::errors::{TransportError, TransportResult};
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardMarkup, InputFile, MessageId};
use teloxide::{ApiError, RequestError};

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Stop the client's loading indicator, optionally with an alert popup
    async fn answer_callback(&self, query_id: &str, alert: Option<&str>) -> TransportResult<()>;

    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> TransportResult<MessageId>;

    /// Replace the text of an existing message. `None` drops its keyboard.
    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> TransportResult<()>;

    /// Replace only the inline keyboard of an existing message
    async fn edit_keyboard(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        keyboard: InlineKeyboardMarkup,
    ) -> TransportResult<()>;

    async fn send_photo(
        &self,
        chat_id: ChatId,
        png: Vec<u8>,
        caption: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> TransportResult<MessageId>;
}

/// [`ChatTransport`] backed by the Bot API
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Re-sending an identical keyboard or text is not a failure
fn ignore_not_modified(operation: &'static str, result: Result<(), RequestError>) -> TransportResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(RequestError::Api(ApiError::MessageNotModified)) => {
            logger::debug(
                LogTag::Telegram,
                &format!("{}: message not modified", operation),
            );
            Ok(())
        }
        Err(e) => Err(TransportError::new(operation, e)),
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn answer_callback(&self, query_id: &str, alert: Option<&str>) -> TransportResult<()> {
        let mut request = self.bot.answer_callback_query(query_id.to_string());
        if let Some(text) = alert {
            request = request.text(text).show_alert(true);
        }
        request
            .await
            .map(|_| ())
            .map_err(|e| TransportError::new("answerCallbackQuery", e))
    }

    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> TransportResult<MessageId> {
        let mut request = self.bot.send_message(chat_id, text);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard);
        }
        request
            .await
            .map(|message| message.id)
            .map_err(|e| TransportError::new("sendMessage", e))
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> TransportResult<()> {
        let mut request = self.bot.edit_message_text(chat_id, message_id, text);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard);
        }
        let result = request.await.map(|_| ());
        ignore_not_modified("editMessageText", result)
    }

    async fn edit_keyboard(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        keyboard: InlineKeyboardMarkup,
    ) -> TransportResult<()> {
        let result = self
            .bot
            .edit_message_reply_markup(chat_id, message_id)
            .reply_markup(keyboard)
            .await
            .map(|_| ());
        ignore_not_modified("editMessageReplyMarkup", result)
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        png: Vec<u8>,
        caption: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> TransportResult<MessageId> {
        let photo = InputFile::memory(png).file_name("chart.png");
        self.bot
            .send_photo(chat_id, photo)
            .caption(caption)
            .reply_markup(keyboard)
            .await
            .map(|message| message.id)
            .map_err(|e| TransportError::new("sendPhoto", e))
    }
}
