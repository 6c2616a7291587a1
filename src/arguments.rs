/// Command-line arguments for the chart bot
///
/// Parsed once in `main` and stored globally so any module can check a flag
/// without threading `Args` through every call.
use crate::logger::{LogTag, LoggerConfig};
use clap::Parser;
use once_cell::sync::OnceCell;

#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "chartbot")]
#[command(about = "Telegram bot serving crypto prices and candlestick charts", long_about = None)]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = crate::config::CONFIG_FILE_PATH)]
    pub config: String,

    /// Show every log line, including verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Debug output for polling and chat API calls
    #[arg(long)]
    pub debug_telegram: bool,

    /// Debug output for the button router
    #[arg(long)]
    pub debug_callback: bool,

    /// Debug output for exchange requests
    #[arg(long)]
    pub debug_market_data: bool,

    /// Debug output for chart rendering
    #[arg(long)]
    pub debug_chart: bool,

    /// Debug output for configuration loading
    #[arg(long)]
    pub debug_config: bool,

    /// Debug output for the access guard
    #[arg(long)]
    pub debug_access: bool,
}

impl Args {
    /// Tags whose Debug output was requested
    pub fn debug_tags(&self) -> Vec<LogTag> {
        [
            (self.debug_telegram, LogTag::Telegram),
            (self.debug_callback, LogTag::Callback),
            (self.debug_market_data, LogTag::MarketData),
            (self.debug_chart, LogTag::Chart),
            (self.debug_config, LogTag::Config),
            (self.debug_access, LogTag::Access),
        ]
        .into_iter()
        .filter_map(|(enabled, tag)| enabled.then_some(tag))
        .collect()
    }

    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig::from_flags(self.verbose, self.quiet, &self.debug_tags())
    }
}

static CMD_ARGS: OnceCell<Args> = OnceCell::new();

/// Store the parsed arguments. Later calls are ignored.
pub fn set_cmd_args(args: Args) {
    let _ = CMD_ARGS.set(args);
}

/// Parsed arguments, or defaults when `set_cmd_args` never ran
pub fn get_cmd_args() -> Args {
    CMD_ARGS.get().cloned().unwrap_or_else(|| Args {
        config: crate::config::CONFIG_FILE_PATH.to_string(),
        ..Args::default()
    })
}

pub fn get_enabled_debug_modes() -> Vec<&'static str> {
    get_cmd_args()
        .debug_tags()
        .iter()
        .map(|tag| tag.to_debug_key())
        .collect()
}
