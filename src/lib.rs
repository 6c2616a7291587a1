pub mod arguments;
pub mod chart;
pub mod config;
pub mod errors;
pub mod logger;
pub mod market_data;
pub mod run;
pub mod telegram;
