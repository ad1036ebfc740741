//! Transport-level errors.
//!
//! These never leave the crate's public `notify` path: the dispatcher turns
//! every one of them into a failed [`NotifyOutcome`](crate::NotifyOutcome).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    /// The request could not be sent or the response could not be read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// No response within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// An environment variable held an unusable value.
    #[error("Invalid value for {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NotifyError::Timeout
        } else {
            NotifyError::Transport(err.to_string())
        }
    }
}
