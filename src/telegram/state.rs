//! Per-user interval preference
//!
//! Owned by the router and shared through `Arc`. Each lock is held for a
//! single map operation only, never across a network call.

use crate::market_data::Interval;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct IntervalStateStore {
    overrides: RwLock<HashMap<u64, Interval>>,
}

impl IntervalStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's override, if they ever pressed an interval button
    pub fn get(&self, user_id: u64) -> Option<Interval> {
        self.overrides.read().get(&user_id).copied()
    }

    /// Last write wins
    pub fn set(&self, user_id: u64, interval: Interval) {
        self.overrides.write().insert(user_id, interval);
    }

    /// Override if present, else `fallback`
    pub fn effective(&self, user_id: u64, fallback: Interval) -> Interval {
        self.get(user_id).unwrap_or(fallback)
    }

    pub fn len(&self) -> usize {
        self.overrides.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.read().is_empty()
    }
}
