//! Error handling
//!
//! Typed errors for draft validation, draft editing and Poll Service calls.
//! None of them are fatal: validation errors are fixed by editing the draft,
//! network errors by retrying the same operation.

use thiserror::Error;

/// A draft that cannot be submitted
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The trimmed question is empty
    #[error("Please enter a question")]
    MissingQuestion,

    /// Fewer than two options have non-empty text
    #[error("Please enter at least 2 options")]
    InsufficientOptions,
}

/// Option position outside the draft
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Option index {index} is out of range (draft has {len} options)")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

/// A failed call to the Poll Service
#[derive(Error, Debug)]
pub enum NetworkError {
    /// The configured base URL cannot be used to build request URLs
    #[error("Invalid Poll Service URL '{url}': {details}")]
    InvalidBaseUrl { url: String, details: String },

    /// Connection, timeout or body transfer failure
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status
    #[error("Poll Service returned {status} for '{url}': {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The response body could not be understood
    #[error("Malformed response from '{url}': {details}")]
    MalformedResponse { url: String, details: String },
}

impl NetworkError {
    /// Check if retrying the same call may succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            NetworkError::Transport { .. } => true,
            NetworkError::Status { status, .. } => *status >= 500 || *status == 429,
            NetworkError::InvalidBaseUrl { .. } | NetworkError::MalformedResponse { .. } => false,
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            NetworkError::InvalidBaseUrl { .. } => {
                Some("Set a valid server address with: ballot config set base_url http://host:port")
            }
            NetworkError::Transport { .. } => {
                Some("Check that the Poll Service is running and reachable, then try again.")
            }
            NetworkError::Status { status: 404, .. } => {
                Some("The poll may have been deleted. Run `ballot list` to refresh.")
            }
            NetworkError::Status { status, .. } if *status >= 500 => {
                Some("The Poll Service had an internal error. Try again later.")
            }
            NetworkError::MalformedResponse { .. } => {
                Some("The server at base_url does not look like a Poll Service.")
            }
            _ => None,
        }
    }
}

/// Errors returned by Poll Store operations
#[derive(Error, Debug)]
pub enum PollError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl PollError {
    /// The validation error, if the draft was rejected locally
    pub fn as_validation(&self) -> Option<ValidationError> {
        match self {
            PollError::Validation(e) => Some(*e),
            PollError::Network(_) => None,
        }
    }
}

/// Result type for Poll Service calls
pub type NetworkResult<T> = Result<T, NetworkError>;
