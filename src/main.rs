use anyhow::{anyhow, Context};
use chartbot::{
    arguments::{self, Args},
    config::{self, with_config},
    logger::{self, LogTag},
};
use clap::Parser;
use std::path::Path;

/// Entry point: args → logger → config → bot
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.logger_config());
    arguments::set_cmd_args(args.clone());

    logger::info(LogTag::System, "🚀 Chart bot starting up...");
    let debug_modes = arguments::get_enabled_debug_modes();
    if !debug_modes.is_empty() {
        logger::info(
            LogTag::System,
            &format!("Debug modes: {}", debug_modes.join(", ")),
        );
    }

    // .env is optional; it only feeds environment overrides
    if dotenv::dotenv().is_ok() {
        logger::debug(LogTag::Config, "Loaded .env file");
    }

    config::load_config_from_path(&args.config)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("loading configuration from {}", args.config))?;
    logger::info(
        LogTag::Config,
        &format!("Configuration loaded from {}", args.config),
    );

    let logging = with_config(|c| c.logging.clone());
    if logging.file_enabled {
        if let Err(e) = logger::enable_file_logging(Path::new(&logging.directory)) {
            logger::warning(
                LogTag::System,
                &format!("File logging disabled: {}", e),
            );
        }
    }

    if let Err(e) = chartbot::run::run_bot().await {
        logger::error(LogTag::System, &format!("Bot failed: {}", e));
        logger::flush();
        return Err(anyhow!(e));
    }
    Ok(())
}
