//! Telegram front end
//!
//! ```text
//! telegram/
//! ├── access.rs      # allowlist guard
//! ├── transport.rs   # ChatTransport trait + Bot API implementation
//! ├── polling.rs     # getUpdates loop, guard → handler dispatch
//! ├── payload.rs     # button payload codec
//! ├── keyboards.rs   # chart menu layout
//! ├── state.rs       # per-user interval store
//! ├── formatters.rs  # message texts
//! └── commands/
//!     ├── mod.rs       # slash command parsing
//!     ├── market.rs    # /price, /analysis
//!     ├── menu.rs      # /start, /help, /cryptos
//!     └── callbacks.rs # button press router
//! ```

pub mod access;
pub mod commands;
pub mod formatters;
pub mod keyboards;
pub mod payload;
pub mod polling;
pub mod state;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use access::AccessGuard;
pub use commands::{CallbackEvent, CallbackOutcome, CallbackRouter, CommandHandler, MessageEvent};
pub use keyboards::chart_menu;
pub use payload::{CallbackPayload, UnparseablePolicy};
pub use polling::{run_polling, InboundEvent, UpdateDispatcher};
pub use state::IntervalStateStore;
pub use transport::{ChatTransport, TelegramTransport};
