//! Result and error types for Vitrina.

use thiserror::Error;

/// Result type for Vitrina operations
pub type VitrinaResult<T> = Result<T, VitrinaError>;

/// Errors that can occur in Vitrina
#[derive(Debug, Error)]
pub enum VitrinaError {
    /// Expected state was not observed on the driven page
    #[error("assertion failed ({context}): expected {expected}, got {actual}")]
    Assertion {
        /// What was being checked (route, landmark, label, ...)
        context: String,
        /// Expected value
        expected: String,
        /// Observed value
        actual: String,
    },

    /// A bounded wait expired
    #[error("timed out after {ms}ms waiting for {waiting_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// What was being waited on
        waiting_for: String,
    },

    /// Navigation error
    #[error("navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Element addressed by a selector is not present on the current view
    #[error("no element for selector {selector}")]
    ElementNotFound {
        /// Selector description
        selector: String,
    },

    /// Driven-session error (launch, connection, evaluation)
    #[error("session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// Non-2xx status from an API convenience call
    #[error("{endpoint} failed with status {status}: {status_text}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Canonical status text
        status_text: String,
        /// Endpoint that was called
        endpoint: String,
    },

    /// Transport-level failure (host unreachable, request construction)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Fixture registry error (unknown role, mismatched type)
    #[error("fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// Persisted auth state is missing, unreadable, or rejected
    #[error("stale persisted auth state: {message}; re-run the auth setup")]
    StaleAuthState {
        /// What went wrong with the artifact
        message: String,
    },

    /// Configuration error
    #[error("configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VitrinaError {
    /// Build an assertion failure with expected-vs-actual detail.
    pub fn assertion(
        context: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Assertion {
            context: context.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
