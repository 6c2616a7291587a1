//! Inline keyboard layouts
//!
//! The chart menu is a grid of watchlist coins (three per row) followed by
//! one row of interval buttons with a checkmark on the active interval.

use crate::market_data::{Interval, WATCHLIST};
use crate::telegram::payload::CallbackPayload;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

const COINS_PER_ROW: usize = 3;
const SELECTED_MARK: &str = " ✓";

/// Create a callback button
fn btn(text: &str, payload: &CallbackPayload) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.to_string(), payload.to_callback_data())
}

/// Label of an interval button
pub fn interval_label(interval: Interval, selected: Interval) -> String {
    if interval == selected {
        format!("{}{}", interval, SELECTED_MARK)
    } else {
        interval.to_string()
    }
}

/// Chart menu for `interval`: coin buttons carry it, the interval row marks it
pub fn chart_menu(interval: Interval) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = WATCHLIST
        .chunks(COINS_PER_ROW)
        .map(|chunk| {
            chunk
                .iter()
                .map(|coin| {
                    btn(
                        coin.label,
                        &CallbackPayload::CoinSelect {
                            symbol: coin.symbol.to_string(),
                            interval,
                        },
                    )
                })
                .collect()
        })
        .collect();

    rows.push(
        Interval::ALL
            .iter()
            .map(|&candidate| {
                btn(
                    &interval_label(candidate, interval),
                    &CallbackPayload::IntervalChange {
                        interval: candidate,
                    },
                )
            })
            .collect(),
    );

    InlineKeyboardMarkup::new(rows)
}
