//! Unified error types for storybot
//!
//! Transient conditions (a locator matching nothing, an obstructed click)
//! are absorbed where they occur and never appear here. Only
//! infrastructure-level and authentication failures become `BotError`.

use thiserror::Error;

/// Unified error type for all storybot operations
#[derive(Error, Debug)]
pub enum BotError {
    /// Browser infrastructure failure: launch, CDP disconnect, navigation
    #[error("Browser error: {0}")]
    Browser(String),

    /// A bounded wait expired before its condition held
    #[error("Timed out after {secs}s waiting for {what}")]
    WaitTimeout { what: String, secs: u64 },

    /// Login did not complete or credentials were unavailable
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BotError {
    /// Construct a timeout error for a named wait
    pub fn timeout(what: impl Into<String>, secs: u64) -> Self {
        BotError::WaitTimeout {
            what: what.into(),
            secs,
        }
    }
}

/// Result type alias using BotError
pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_the_wait() {
        let err = BotError::timeout("login form", 20);
        assert_eq!(err.to_string(), "Timed out after 20s waiting for login form");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BotError = io.into();
        assert!(matches!(err, BotError::Io(_)));
    }
}
