//! Sync client for the remote Poll Service
//!
//! Maps poll operations to remote calls and returns typed results. The
//! [`PollService`] trait is the seam the [`PollStore`](crate::PollStore)
//! talks to; [`HttpPollService`] is the HTTP implementation.
//!
//! ## Endpoints
//!
//! | Operation   | Request                                  |
//! |-------------|------------------------------------------|
//! | create      | `POST   /api/polls/createPoll`           |
//! | list        | `GET    /api/polls/getPolls`             |
//! | vote        | `GET    /api/polls/{poll}/vote/{option}` |
//! | update      | `PUT    /api/polls/{poll}`               |
//! | delete      | `DELETE /api/polls/{poll}`               |

mod client;
#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::NetworkResult;
use crate::models::{Id, Poll};

pub use client::HttpPollService;

/// One option in a create or update request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OptionPayload {
    /// Only present for options that already exist on the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub text: String,
}

/// Body of a create request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreatePollRequest {
    pub question: String,
    pub options: Vec<OptionPayload>,
}

/// Body of an update request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpdatePollRequest {
    pub question: String,
    pub options: Vec<OptionPayload>,
}

/// Remote Poll Service operations
///
/// Implementations validate server responses and report anything they
/// cannot trust as [`NetworkError`](crate::NetworkError).
#[async_trait]
pub trait PollService: Send + Sync {
    /// Fetch every poll, in server order
    async fn fetch_polls(&self) -> NetworkResult<Vec<Poll>>;

    /// Create a poll and return it as stored
    async fn create_poll(&self, request: &CreatePollRequest) -> NetworkResult<Poll>;

    /// Replace a poll's question and options
    async fn update_poll(&self, poll_id: &Id, request: &UpdatePollRequest) -> NetworkResult<Poll>;

    /// Cast one vote and return the full updated poll
    async fn cast_vote(&self, poll_id: &Id, option_id: &Id) -> NetworkResult<Poll>;

    /// Delete a poll
    async fn delete_poll(&self, poll_id: &Id) -> NetworkResult<()>;
}
