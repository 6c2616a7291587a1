// Bot wiring: builds every component from config and polls until a shutdown signal

use crate::chart::ChartRenderer;
use crate::config::with_config;
use crate::logger::{self, LogTag};
use crate::market_data::MarketDataClient;
use crate::telegram::{
    run_polling, AccessGuard, CallbackRouter, ChatTransport, CommandHandler, IntervalStateStore,
    TelegramTransport, UpdateDispatcher,
};
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tokio::sync::Notify;

/// How long in-flight handlers get to finish after polling stops
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Main bot execution function - runs until Ctrl+C / SIGTERM
pub async fn run_bot() -> Result<(), String> {
    let telegram = with_config(|c| c.telegram.clone());
    if telegram.bot_token.trim().is_empty() {
        return Err(format!(
            "No bot token configured (set telegram.bot_token or {})",
            crate::config::BOT_TOKEN_ENV
        ));
    }

    // 1. Validate the token before anything else
    let bot = Bot::new(telegram.bot_token.trim());
    let me = bot
        .get_me()
        .await
        .map_err(|e| format!("Invalid bot token: {}", e))?;
    logger::info(
        LogTag::Telegram,
        &format!(
            "Bot validated: @{} (ID: {})",
            me.username.as_deref().unwrap_or("unknown"),
            me.id
        ),
    );

    // 2. Access guard
    let guard = AccessGuard::from_config();
    if guard.allowed_count() == 0 {
        logger::warning(
            LogTag::Access,
            "telegram.allowed_users is empty, every user will be rejected",
        );
    } else {
        logger::info(
            LogTag::Access,
            &format!("{} user(s) allowed", guard.allowed_count()),
        );
    }

    // 3. Shared components
    let market_cfg = with_config(|c| c.market_data.clone());
    let market = Arc::new(MarketDataClient::from_config()?);
    let renderer = ChartRenderer::from_config();
    let store = Arc::new(IntervalStateStore::new());
    let transport: Arc<dyn ChatTransport> = Arc::new(TelegramTransport::new(bot.clone()));

    let commands = CommandHandler::new(market.clone(), store.clone(), transport.clone())
        .with_quote_asset(&market_cfg.quote_asset)
        .with_default_interval(telegram.default_interval);
    let callbacks = CallbackRouter::new(market, store, renderer, transport.clone())
        .with_candle_limit(market_cfg.candle_limit)
        .with_default_interval(telegram.default_interval)
        .with_unparseable_policy(telegram.unparseable_callbacks);
    let dispatcher = Arc::new(UpdateDispatcher::new(guard, commands, callbacks, transport));

    // 4. Poll until a shutdown signal arrives
    let shutdown = Arc::new(Notify::new());
    let poller = tokio::spawn(run_polling(
        bot,
        dispatcher,
        telegram.poll_timeout_secs,
        shutdown.clone(),
    ));

    wait_for_shutdown_signal().await?;

    logger::info(LogTag::System, "Initiating graceful shutdown...");
    // notify_one keeps a permit if the poller is between rounds
    shutdown.notify_one();
    if let Err(e) = poller.await {
        logger::error(LogTag::System, &format!("Polling task failed: {}", e));
    }
    tokio::time::sleep(DRAIN_GRACE).await;

    logger::info(LogTag::System, "Chart bot stopped");
    logger::flush();
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C, SIGTERM on Unix)
async fn wait_for_shutdown_signal() -> Result<(), String> {
    logger::info(
        LogTag::System,
        "Waiting for shutdown signal (press Ctrl+C twice to force kill)",
    );

    #[cfg(unix)]
    let signal_name = {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint =
            signal(SignalKind::interrupt()).map_err(|e| format!("Failed to bind SIGINT: {}", e))?;
        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|e| format!("Failed to bind SIGTERM: {}", e))?;

        tokio::select! {
            _ = sigint.recv() => "SIGINT",
            _ = sigterm.recv() => "SIGTERM",
        }
    };

    #[cfg(not(unix))]
    let signal_name = {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| format!("Failed to listen for shutdown signal: {}", e))?;
        "CTRL_C"
    };

    logger::warning(
        LogTag::System,
        &format!(
            "Shutdown signal received ({}). Press Ctrl+C again to force kill.",
            signal_name
        ),
    );

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            logger::error(LogTag::System, "Second Ctrl+C detected, forcing exit.");
            // 130 is the conventional exit code for SIGINT
            std::process::exit(130);
        }
    });

    Ok(())
}
