//! Structured logging for the chart bot
//!
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-subsystem debug control via --debug-<tag> flags
//! - Dual output: colored console + daily log file
//!
//! ## Usage
//!
//! ```rust
//! use chartbot::logger::{self, LogTag};
//!
//! logger::info(LogTag::Telegram, "Polling started");
//! logger::debug(LogTag::Callback, "payload=coin:BTCUSDT:1h"); // only with --debug-callback
//! ```

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Install the console filter. Call once at startup, before services start.
pub fn init(config: LoggerConfig) {
    set_logger_config(config);
}

/// Additionally persist every emitted line under `directory`
pub fn enable_file_logging(directory: &std::path::Path) -> Result<(), String> {
    file::init_file_logging(directory)
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level, shown only when --debug-<tag> is set
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level, shown only with --verbose
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush pending file writes (call during shutdown)
pub fn flush() {
    file::flush_file_logging();
}
