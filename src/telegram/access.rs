//! Allowlist guard run ahead of every handler

use crate::config::with_config;
use std::collections::HashSet;

pub const UNAUTHORIZED_MESSAGE: &str = "❌ You are not authorized to use this bot.";
pub const ACCESS_DENIED_ALERT: &str = "❌ Access denied";

#[derive(Debug, Clone, Default)]
pub struct AccessGuard {
    allowed: HashSet<u64>,
}

impl AccessGuard {
    pub fn new(allowed: impl IntoIterator<Item = u64>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn from_config() -> Self {
        with_config(|cfg| Self::new(cfg.telegram.allowed_users.iter().copied()))
    }

    /// An empty allowlist admits nobody
    pub fn is_authorized(&self, user_id: u64) -> bool {
        self.allowed.contains(&user_id)
    }

    pub fn allowed_count(&self) -> usize {
        self.allowed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowlist_membership() {
        let guard = AccessGuard::new([6691628498, 7]);
        assert!(guard.is_authorized(7));
        assert!(guard.is_authorized(6691628498));
        assert!(!guard.is_authorized(8));
        assert_eq!(guard.allowed_count(), 2);
    }

    #[test]
    fn test_empty_allowlist_denies_everyone() {
        let guard = AccessGuard::default();
        assert!(!guard.is_authorized(0));
        assert!(!guard.is_authorized(42));
    }
}
