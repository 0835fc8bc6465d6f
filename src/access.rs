//! Allow-list check applied to every incoming update.

use std::collections::HashSet;

use teloxide::types::UserId;

use crate::errors::ParseError;

/// Reply sent to anyone who is not on the allow-list
pub const REJECTION_REPLY: &str = "🤔";

/// Static set of Telegram user ids allowed to use the bot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessGuard {
    allowed: HashSet<i64>,
}

impl AccessGuard {
    pub fn new(allowed: impl IntoIterator<Item = i64>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    /// Parse a comma-separated list such as "42, 1337"
    ///
    /// Empty entries are skipped; anything that is not an integer is an error.
    pub fn parse(list: &str) -> Result<Self, ParseError> {
        let mut allowed = HashSet::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let id = entry
                .parse::<i64>()
                .map_err(|_| ParseError::InvalidUserId(entry.to_string()))?;
            allowed.insert(id);
        }
        Ok(Self { allowed })
    }

    pub fn is_allowed(&self, user_id: i64) -> bool {
        self.allowed.contains(&user_id)
    }

    /// Check the sender of an update; updates without a sender are refused
    pub fn admits(&self, sender: Option<UserId>) -> bool {
        sender.is_some_and(|id| self.is_allowed(id.0 as i64))
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}
