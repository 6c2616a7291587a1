//! Configuration system
//!
//! Sections are declared with `config_struct!` in `schemas.rs`, loaded from
//! TOML by `utils.rs` and read anywhere through `with_config`.

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{ChartConfig, Config, LoggingConfig, MarketDataConfig, TelegramConfig};
pub use utils::{
    apply_env_overrides, load_config_from_path, parse_config, read_config_file, with_config,
    BOT_TOKEN_ENV, CONFIG_FILE_PATH,
};
