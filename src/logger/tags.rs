/// Log tags identify the subsystem a line comes from
///
/// Each tag maps to a `--debug-<key>` flag that unlocks its Debug output.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Telegram,
    Callback,
    MarketData,
    Chart,
    Access,
}

impl LogTag {
    /// Fixed-width label used in console and file output
    pub fn to_plain_string(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Telegram => "TELEGRAM",
            LogTag::Callback => "CALLBACK",
            LogTag::MarketData => "MARKET",
            LogTag::Chart => "CHART",
            LogTag::Access => "ACCESS",
        }
    }

    /// Key used by `--debug-<key>` flags
    pub fn to_debug_key(&self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Config => "config",
            LogTag::Telegram => "telegram",
            LogTag::Callback => "callback",
            LogTag::MarketData => "market-data",
            LogTag::Chart => "chart",
            LogTag::Access => "access",
        }
    }

    pub fn all() -> [LogTag; 7] {
        [
            LogTag::System,
            LogTag::Config,
            LogTag::Telegram,
            LogTag::Callback,
            LogTag::MarketData,
            LogTag::Chart,
            LogTag::Access,
        ]
    }
}
