//! Chart rendering: candle series in, PNG bytes out

mod draw;
pub mod renderer;

pub use renderer::{ChartRenderer, ChartStyle};
