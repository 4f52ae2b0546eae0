//! Long polling: marker-driven `GET /updates` loop feeding a bounded channel.

mod listen;
mod page;
mod stream;

use std::time::Duration;

use max_bot_schemes::UpdateType;

use crate::constants::{
    DEFAULT_POLL_LIMIT, DEFAULT_POLL_PAUSE_MS, DEFAULT_POLL_TIMEOUT_SECS, DEFAULT_UPDATES_CAPACITY,
};

pub(crate) use listen::run_polling_loop;
pub use page::{UpdatesPage, UpdatesQuery};
pub use stream::UpdateStream;

/// Tuning of one polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingOptions {
    /// How long the server may hold a request open waiting for updates.
    pub long_poll_timeout: Duration,
    /// Pause after a failed poll before the next attempt.
    pub pause: Duration,
    /// Maximum updates per page; clamped to the server's accepted range.
    pub limit: u32,
    /// Update kinds to receive; empty means all.
    pub types: Vec<UpdateType>,
    /// Capacity of the update channel.
    pub capacity: usize,
}

impl Default for PollingOptions {
    fn default() -> Self {
        Self {
            long_poll_timeout: Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
            pause: Duration::from_millis(DEFAULT_POLL_PAUSE_MS),
            limit: DEFAULT_POLL_LIMIT,
            types: Vec::new(),
            capacity: DEFAULT_UPDATES_CAPACITY,
        }
    }
}

impl PollingOptions {
    /// Query for the page after `marker`.
    #[must_use]
    pub fn query(&self, marker: i64) -> UpdatesQuery {
        UpdatesQuery {
            marker,
            limit: self.limit,
            timeout: self.long_poll_timeout,
            types: self.types.clone(),
        }
    }
}
