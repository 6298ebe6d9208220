//! Command handlers

pub mod config;
pub mod poll;

use ballotbox_core::{NetworkError, PollError};

/// Turn a Poll Service failure into an error with a hint for the user
pub fn explain(err: NetworkError) -> anyhow::Error {
    match err.recovery_suggestion() {
        Some(hint) => anyhow::anyhow!("{}\nHint: {}", err, hint),
        None => anyhow::Error::new(err),
    }
}

/// Same as [`explain`], passing validation errors through unchanged
pub fn explain_poll_error(err: PollError) -> anyhow::Error {
    match err {
        PollError::Network(e) => explain(e),
        PollError::Validation(e) => anyhow::Error::new(e),
    }
}
