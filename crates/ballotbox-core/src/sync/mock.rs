//! In-memory Poll Service for tests
//!
//! Responses are queued per operation and handed out in order. Every call is
//! recorded so tests can assert on what reached the "network".

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{CreatePollRequest, PollService, UpdatePollRequest};
use crate::error::{NetworkError, NetworkResult};
use crate::models::{Id, Poll};

/// A call received by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchPolls,
    CreatePoll(CreatePollRequest),
    UpdatePoll(Id, UpdatePollRequest),
    CastVote(Id, Id),
    DeletePoll(Id),
}

#[derive(Default)]
struct MockState {
    lists: VecDeque<NetworkResult<Vec<Poll>>>,
    polls: VecDeque<NetworkResult<Poll>>,
    deletes: VecDeque<NetworkResult<()>>,
    calls: Vec<Call>,
}

/// Clonable handle; clones share queues and the call log
#[derive(Clone, Default)]
pub struct MockPollService {
    state: Arc<Mutex<MockState>>,
}

/// A failure the mock can hand out
pub fn unavailable() -> NetworkError {
    NetworkError::Status {
        url: "mock://polls".to_string(),
        status: 503,
        body: "service unavailable".to_string(),
    }
}

impl MockPollService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next `fetch_polls`
    pub fn push_list(&self, result: NetworkResult<Vec<Poll>>) -> &Self {
        self.state.lock().unwrap().lists.push_back(result);
        self
    }

    /// Queue a response for the next create, update or vote
    pub fn push_poll(&self, result: NetworkResult<Poll>) -> &Self {
        self.state.lock().unwrap().polls.push_back(result);
        self
    }

    /// Queue a response for the next delete
    pub fn push_delete(&self, result: NetworkResult<()>) -> &Self {
        self.state.lock().unwrap().deletes.push_back(result);
        self
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn next_poll(&self) -> NetworkResult<Poll> {
        self.state
            .lock()
            .unwrap()
            .polls
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }
}

#[async_trait]
impl PollService for MockPollService {
    async fn fetch_polls(&self) -> NetworkResult<Vec<Poll>> {
        self.record(Call::FetchPolls);
        self.state
            .lock()
            .unwrap()
            .lists
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }

    async fn create_poll(&self, request: &CreatePollRequest) -> NetworkResult<Poll> {
        self.record(Call::CreatePoll(request.clone()));
        self.next_poll()
    }

    async fn update_poll(&self, poll_id: &Id, request: &UpdatePollRequest) -> NetworkResult<Poll> {
        self.record(Call::UpdatePoll(poll_id.clone(), request.clone()));
        self.next_poll()
    }

    async fn cast_vote(&self, poll_id: &Id, option_id: &Id) -> NetworkResult<Poll> {
        self.record(Call::CastVote(poll_id.clone(), option_id.clone()));
        self.next_poll()
    }

    async fn delete_poll(&self, poll_id: &Id) -> NetworkResult<()> {
        self.record(Call::DeletePoll(poll_id.clone()));
        self.state
            .lock()
            .unwrap()
            .deletes
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }
}
