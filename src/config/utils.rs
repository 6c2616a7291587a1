//! Configuration utilities - loading and access helpers
//!
//! - Loading configuration from disk (TOML)
//! - Environment overrides for secrets
//! - Thread-safe access helpers

use super::schemas::Config;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;

/// Global configuration instance
///
/// This is the single source of truth for all configuration values.
/// Access it using the helper functions below.
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Served by `with_config` before `load_config_from_path` has run (unit tests, tooling)
static DEFAULT_CONFIG: Lazy<Config> = Lazy::new(Config::default);

/// Default configuration file path
pub const CONFIG_FILE_PATH: &str = "data/config.toml";

/// Environment variable that overrides `telegram.bot_token`
pub const BOT_TOKEN_ENV: &str = "CHARTBOT_BOT_TOKEN";

/// Parse and validate a TOML document
pub fn parse_config(contents: &str) -> Result<Config, String> {
    let config = toml::from_str::<Config>(contents)
        .map_err(|e| format!("Failed to parse config: {}", e))?;
    config.validate()?;
    Ok(config)
}

/// Read a config file, falling back to defaults when it does not exist
pub fn read_config_file(path: &str) -> Result<Config, String> {
    if !std::path::Path::new(path).exists() {
        eprintln!("⚠️  Config file '{}' not found, using default values", path);
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path, e))?;

    parse_config(&contents).map_err(|e| format!("{} ('{}')", e, path))
}

/// Apply environment overrides (after `.env` has been loaded)
pub fn apply_env_overrides(config: &mut Config) {
    if let Ok(token) = std::env::var(BOT_TOKEN_ENV) {
        if !token.trim().is_empty() {
            config.telegram.bot_token = token.trim().to_string();
        }
    }
}

/// Load configuration from a specific file path and initialize the global CONFIG
///
/// # Returns
/// - `Ok(())` - Configuration loaded successfully
/// - `Err(String)` - Error message if loading failed
pub fn load_config_from_path(path: &str) -> Result<(), String> {
    let mut config = read_config_file(path)?;
    apply_env_overrides(&mut config);

    CONFIG
        .set(RwLock::new(config))
        .map_err(|_| "Config already initialized".to_string())?;

    Ok(())
}

/// Read configuration values with a closure
///
/// # Example
/// ```
/// use chartbot::config::with_config;
///
/// let limit = with_config(|cfg| cfg.market_data.candle_limit);
/// assert!(limit > 0);
/// ```
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    match CONFIG.get() {
        Some(lock) => f(&lock.read()),
        None => f(&DEFAULT_CONFIG),
    }
}
