/// Logger runtime configuration
///
/// Built from command-line flags at startup and stored globally so that the
/// free logging functions can filter without any handle being passed around.
use super::levels::LogLevel;
use super::tags::LogTag;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct LoggerConfig {
    /// Lines above this level are dropped (Debug/Verbose have extra gates)
    pub min_level: LogLevel,
    /// Tags whose Debug output is enabled
    pub debug_tags: HashSet<LogTag>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
        }
    }
}

impl LoggerConfig {
    /// Configuration implied by the CLI flags
    pub fn from_flags(verbose: bool, quiet: bool, debug_tags: &[LogTag]) -> Self {
        let min_level = if quiet {
            LogLevel::Warning
        } else if verbose {
            LogLevel::Verbose
        } else if debug_tags.is_empty() {
            LogLevel::Info
        } else {
            LogLevel::Debug
        };

        Self {
            min_level,
            debug_tags: debug_tags.iter().copied().collect(),
        }
    }

    pub fn is_debug_enabled_for(&self, tag: &LogTag) -> bool {
        self.min_level == LogLevel::Verbose || self.debug_tags.contains(tag)
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}
