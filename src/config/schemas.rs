/// Configuration schemas - all config structures defined once with defaults
///
/// Each struct is defined using the config_struct! macro which provides:
/// - Single-source definition (no repetition)
/// - Embedded defaults
/// - Serde support
use crate::config_struct;
use crate::market_data::Interval;
use crate::telegram::payload::UnparseablePolicy;

// ============================================================================
// TELEGRAM CONFIGURATION
// ============================================================================

config_struct! {
    /// Telegram bot connection and behaviour
    pub struct TelegramConfig {
        /// Bot token from @BotFather (CHARTBOT_BOT_TOKEN overrides it)
        bot_token: String = String::new(),

        /// Telegram user ids allowed to talk to the bot
        allowed_users: Vec<u64> = Vec::new(),

        /// Long-poll timeout passed to getUpdates
        poll_timeout_secs: u32 = 10,

        /// Interval embedded in a freshly opened /cryptos menu
        default_interval: Interval = Interval::Hour1,

        /// What to do with button payloads that cannot be parsed
        unparseable_callbacks: UnparseablePolicy = UnparseablePolicy::Ignore,
    }
}

// ============================================================================
// MARKET DATA CONFIGURATION
// ============================================================================

config_struct! {
    /// Exchange public REST API
    pub struct MarketDataConfig {
        base_url: String = "https://api.binance.com".to_string(),
        ticker_timeout_secs: u64 = 10,
        klines_timeout_secs: u64 = 12,
        /// Candles requested per chart
        candle_limit: u32 = 200,
        /// Appended to bare coin names typed in commands
        quote_asset: String = "USDT".to_string(),
    }
}

// ============================================================================
// CHART CONFIGURATION
// ============================================================================

config_struct! {
    /// Rendered chart size in pixels
    pub struct ChartConfig {
        width: u32 = 900,
        height: u32 = 500,
    }
}

// ============================================================================
// LOGGING CONFIGURATION
// ============================================================================

config_struct! {
    pub struct LoggingConfig {
        file_enabled: bool = true,
        directory: String = "data/logs".to_string(),
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration structure containing all sub-configurations
    pub struct Config {
        telegram: TelegramConfig = TelegramConfig::default(),
        market_data: MarketDataConfig = MarketDataConfig::default(),
        chart: ChartConfig = ChartConfig::default(),
        logging: LoggingConfig = LoggingConfig::default(),
    }
}

impl Config {
    /// Reject values the rest of the bot cannot work with
    pub fn validate(&self) -> Result<(), String> {
        let md = &self.market_data;
        if md.ticker_timeout_secs == 0 || md.klines_timeout_secs == 0 {
            return Err("market_data timeouts must be greater than zero".to_string());
        }
        if md.candle_limit == 0 || md.candle_limit > 1000 {
            return Err(format!(
                "market_data.candle_limit must be within 1..=1000 (got {})",
                md.candle_limit
            ));
        }
        if md.base_url.trim().is_empty() {
            return Err("market_data.base_url is empty".to_string());
        }
        if md.quote_asset.trim().is_empty() {
            return Err("market_data.quote_asset is empty".to_string());
        }
        if self.chart.width < 200 || self.chart.height < 150 {
            return Err(format!(
                "chart size {}x{} is too small (minimum 200x150)",
                self.chart.width, self.chart.height
            ));
        }
        if self.telegram.poll_timeout_secs == 0 {
            return Err("telegram.poll_timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}
