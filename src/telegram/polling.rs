//! Update polling and per-update dispatch
//!
//! Long-polls `getUpdates` with a moving offset. Every update runs on its own
//! task so a slow chart for one user never holds up anybody else.

use crate::logger::{self, LogTag};
use crate::telegram::access::{AccessGuard, ACCESS_DENIED_ALERT, UNAUTHORIZED_MESSAGE};
use crate::telegram::commands::{CallbackEvent, CallbackRouter, CommandHandler, MessageEvent};
use crate::telegram::transport::ChatTransport;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{AllowedUpdate, ChatId, Update, UpdateKind};
use tokio::sync::Notify;

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// An update the bot knows how to handle
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Message(MessageEvent),
    Callback(CallbackEvent),
}

impl InboundEvent {
    pub fn user_id(&self) -> u64 {
        match self {
            InboundEvent::Message(m) => m.user_id,
            InboundEvent::Callback(c) => c.user_id,
        }
    }

    /// Extract text messages and button presses; everything else is dropped
    pub fn from_update(update: Update) -> Option<InboundEvent> {
        match update.kind {
            UpdateKind::Message(message) => {
                let user = message.from.as_ref()?;
                let text = message.text()?;
                Some(InboundEvent::Message(MessageEvent {
                    user_id: user.id.0,
                    chat_id: message.chat.id,
                    text: text.to_string(),
                }))
            }
            UpdateKind::CallbackQuery(query) => {
                let user_id = query.from.id.0;
                let (chat_id, message_id) = match query.message.as_ref() {
                    Some(message) => (message.chat().id, Some(message.id())),
                    // Private chat ids equal the user id
                    None => (ChatId(user_id as i64), None),
                };
                Some(InboundEvent::Callback(CallbackEvent {
                    query_id: query.id.clone(),
                    user_id,
                    chat_id,
                    message_id,
                    data: query.data.clone().unwrap_or_default(),
                }))
            }
            _ => None,
        }
    }
}

/// Access guard composed ahead of the command handler and the callback router
pub struct UpdateDispatcher {
    guard: AccessGuard,
    commands: CommandHandler,
    callbacks: CallbackRouter,
    transport: Arc<dyn ChatTransport>,
}

impl UpdateDispatcher {
    pub fn new(
        guard: AccessGuard,
        commands: CommandHandler,
        callbacks: CallbackRouter,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            guard,
            commands,
            callbacks,
            transport,
        }
    }

    pub async fn dispatch(&self, event: InboundEvent) {
        if !self.guard.is_authorized(event.user_id()) {
            self.reject(&event).await;
            return;
        }

        match event {
            InboundEvent::Message(message) => {
                self.commands.handle(&message).await;
            }
            InboundEvent::Callback(callback) => {
                self.callbacks.handle(&callback).await;
            }
        }
    }

    async fn reject(&self, event: &InboundEvent) {
        logger::warning(
            LogTag::Access,
            &format!("Rejected update from unauthorized user {}", event.user_id()),
        );

        let result = match event {
            InboundEvent::Message(message) => self
                .transport
                .send_text(message.chat_id, UNAUTHORIZED_MESSAGE, None)
                .await
                .map(|_| ()),
            InboundEvent::Callback(callback) => {
                self.transport
                    .answer_callback(&callback.query_id, Some(ACCESS_DENIED_ALERT))
                    .await
            }
        };

        if let Err(e) = result {
            logger::debug(LogTag::Access, &format!("Rejection notice failed: {}", e));
        }
    }
}

/// Poll until `shutdown` is notified
pub async fn run_polling(
    bot: Bot,
    dispatcher: Arc<UpdateDispatcher>,
    poll_timeout_secs: u32,
    shutdown: Arc<Notify>,
) {
    logger::info(LogTag::Telegram, "Update polling started");
    let mut offset: i32 = 0;

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                logger::info(LogTag::Telegram, "Polling received shutdown signal");
                break;
            }
            next = poll_once(&bot, &dispatcher, offset, poll_timeout_secs) => {
                offset = next;
            }
        }
    }

    logger::info(LogTag::Telegram, "Update polling stopped");
}

/// One `getUpdates` round. Returns the offset for the next round.
async fn poll_once(
    bot: &Bot,
    dispatcher: &Arc<UpdateDispatcher>,
    offset: i32,
    poll_timeout_secs: u32,
) -> i32 {
    let mut request = bot
        .get_updates()
        .timeout(poll_timeout_secs)
        .allowed_updates(vec![AllowedUpdate::Message, AllowedUpdate::CallbackQuery]);
    if offset > 0 {
        request = request.offset(offset);
    }

    match request.await {
        Ok(updates) => {
            let mut next = offset;
            for update in updates {
                // Acknowledge even updates we drop so they are not redelivered
                next = update.id.0 as i32 + 1;

                let Some(event) = InboundEvent::from_update(update) else {
                    continue;
                };
                logger::verbose(
                    LogTag::Telegram,
                    &format!("Dispatching update from user {}", event.user_id()),
                );

                let dispatcher = Arc::clone(dispatcher);
                tokio::spawn(async move {
                    dispatcher.dispatch(event).await;
                });
            }
            next
        }
        Err(e) => {
            logger::debug(
                LogTag::Telegram,
                &format!("Poll error (will retry): {}", e),
            );
            tokio::time::sleep(RETRY_DELAY).await;
            offset
        }
    }
}
