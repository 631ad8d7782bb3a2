//! Bounded waits.
//!
//! Every suspend point in the harness (navigation, element visibility,
//! network) carries a bounded wait; exceeding the bound surfaces as a
//! [`VitrinaError::Timeout`] naming what was awaited, distinct from an
//! assertion failure.

use std::time::{Duration, Instant};

use crate::result::VitrinaError;

/// Default timeout for wait operations (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// A running deadline for one wait operation.
#[derive(Debug)]
pub struct Deadline {
    started: Instant,
    timeout_ms: u64,
}

impl Deadline {
    /// Start a deadline from now.
    #[must_use]
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            started: Instant::now(),
            timeout_ms,
        }
    }

    /// Start a deadline from wait options.
    #[must_use]
    pub fn from_options(options: &WaitOptions) -> Self {
        Self::new(options.timeout_ms)
    }

    /// Whether the deadline has passed.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.started.elapsed() >= Duration::from_millis(self.timeout_ms)
    }

    /// Timeout error attributing the expiry to a specific wait.
    #[must_use]
    pub fn timeout_error(&self, waiting_for: impl Into<String>) -> VitrinaError {
        VitrinaError::Timeout {
            ms: self.timeout_ms,
            waiting_for: waiting_for.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = WaitOptions::default();
        assert_eq!(options.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
        assert_eq!(options.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }

    #[test]
    fn test_builder_methods() {
        let options = WaitOptions::new().with_timeout(250).with_poll_interval(10);
        assert_eq!(options.timeout_ms, 250);
        assert_eq!(options.poll_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_zero_deadline_expires_immediately() {
        let deadline = Deadline::new(0);
        assert!(deadline.expired());
    }

    #[test]
    fn test_long_deadline_not_expired() {
        let deadline = Deadline::new(60_000);
        assert!(!deadline.expired());
    }

    #[test]
    fn test_timeout_error_names_the_wait() {
        let deadline = Deadline::new(123);
        let err = deadline.timeout_error("inventory-list visible");
        match err {
            VitrinaError::Timeout { ms, waiting_for } => {
                assert_eq!(ms, 123);
                assert_eq!(waiting_for, "inventory-list visible");
            }
            other => panic!("expected Timeout, got {other:?}"),
        }
    }
}
