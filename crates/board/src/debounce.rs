//! Search input debouncing.
//!
//! Keystrokes arrive faster than the board should re-filter. The debouncer
//! holds the latest value and releases it once the input has been quiet for
//! the configured delay. This is the only rate limiting in the engine.

use std::time::{Duration, Instant};

/// How long the search input must be quiet before it applies.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Holds the latest value of a rapidly-changing input until it settles.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Records a new input value at `now`, restarting the quiet period.
    pub fn push(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now));
    }

    /// Releases the pending value if the quiet period has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let (_, since) = self.pending.as_ref()?;
        if now.duration_since(*since) >= self.delay {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Releases the pending value immediately, quiet or not.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Returns `true` while an input is waiting out its quiet period.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}
