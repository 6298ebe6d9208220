//! Poll Store
//!
//! The `PollStore` owns the local cache of polls and is the single source of
//! truth the presentation layer reads from. The cache only changes as the
//! direct result of a successful Poll Service call:
//!
//! - `refresh` replaces the whole cache with the server's list
//! - `create` appends the poll the server returned
//! - `update` and `cast_vote` replace the matching poll in place
//! - `remove` drops the poll once the server confirms
//!
//! A failed call leaves the cache exactly as it was. Mutating methods take
//! `&mut self`, so two of them can never be in flight on the same store.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = PollStore::new(HttpPollService::new(&config)?);
//! store.refresh().await?;
//!
//! let mut editor = DraftEditor::new();
//! editor.set_question("Best fruit?");
//! editor.set_option_text(0, "Apple")?;
//! editor.set_option_text(1, "Banana")?;
//! store.create(&mut editor).await?;
//! ```

use std::collections::HashSet;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::draft::{DraftEditor, EditSession};
use crate::error::{NetworkError, PollError};
use crate::models::{Id, Poll};
use crate::sync::PollService;

/// Local cache of polls backed by a Poll Service
pub struct PollStore<S> {
    /// Remote Poll Service
    service: S,
    /// Cached polls in last-known server order
    polls: Vec<Poll>,
    /// Publishes the cache after every change
    changes: watch::Sender<Vec<Poll>>,
}

impl<S: PollService> PollStore<S> {
    /// Create a store with an empty cache
    pub fn new(service: S) -> Self {
        let (changes, _) = watch::channel(Vec::new());
        Self {
            service,
            polls: Vec::new(),
            changes,
        }
    }

    /// Cached polls in last-known server order
    pub fn list(&self) -> &[Poll] {
        &self.polls
    }

    /// Get a cached poll by id
    pub fn get(&self, id: &Id) -> Option<&Poll> {
        self.polls.iter().find(|p| &p.id == id)
    }

    /// Subscribe to cache changes
    ///
    /// The receiver always holds the latest cache contents.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Poll>> {
        self.changes.subscribe()
    }

    /// Replace the cache with the server's list of polls
    pub async fn refresh(&mut self) -> Result<(), NetworkError> {
        let polls = self.service.fetch_polls().await?;

        let mut seen = HashSet::new();
        let polls: Vec<Poll> = polls
            .into_iter()
            .filter(|p| {
                let fresh = seen.insert(p.id.clone());
                if !fresh {
                    warn!("Ignoring duplicate poll {} in server list", p.id);
                }
                fresh
            })
            .collect();

        info!("Refreshed {} poll(s)", polls.len());
        self.polls = polls;
        self.publish();
        Ok(())
    }

    /// Submit the editor's draft as a new poll
    ///
    /// On success the returned poll is appended and the editor reset. A
    /// draft that fails validation never reaches the Poll Service.
    pub async fn create(&mut self, editor: &mut DraftEditor) -> Result<&Poll, PollError> {
        let request = editor.validate()?.into_create_request();
        let poll = self.service.create_poll(&request).await?;

        if self.get(&poll.id).is_some() {
            return Err(mismatch(&poll.id, "created poll id is already cached").into());
        }

        info!("Created poll {}", poll.id);
        editor.begin_create();
        self.polls.push(poll);
        self.publish();
        Ok(&self.polls[self.polls.len() - 1])
    }

    /// Submit the editor's draft as an edit of `poll_id`
    ///
    /// Options that came from the original poll keep their ids; appended
    /// options are sent without one. The cached poll is replaced in place.
    pub async fn update(
        &mut self,
        poll_id: &Id,
        editor: &mut DraftEditor,
    ) -> Result<Option<&Poll>, PollError> {
        let request = editor.validate()?.into_update_request();
        let poll = self.service.update_poll(poll_id, &request).await?;
        check_identity(poll_id, &poll)?;

        info!("Updated poll {}", poll_id);
        editor.begin_create();
        Ok(self.replace(poll))
    }

    /// Submit the draft according to the editor's session
    pub async fn submit(&mut self, editor: &mut DraftEditor) -> Result<Option<&Poll>, PollError> {
        match editor.session().clone() {
            EditSession::Create => self.create(editor).await.map(Some),
            EditSession::Edit(poll_id) => self.update(&poll_id, editor).await,
        }
    }

    /// Cast a vote and adopt the server's poll
    ///
    /// The cached poll is replaced wholesale; counts are never incremented
    /// locally.
    pub async fn cast_vote(
        &mut self,
        poll_id: &Id,
        option_id: &Id,
    ) -> Result<Option<&Poll>, NetworkError> {
        let poll = self.service.cast_vote(poll_id, option_id).await?;
        check_identity(poll_id, &poll)?;

        debug!("Vote on poll {} option {} recorded", poll_id, option_id);
        Ok(self.replace(poll))
    }

    /// Delete a poll
    ///
    /// Callers are expected to have confirmed the removal with the user.
    pub async fn remove(&mut self, poll_id: &Id) -> Result<(), NetworkError> {
        self.service.delete_poll(poll_id).await?;

        let before = self.polls.len();
        self.polls.retain(|p| &p.id != poll_id);
        if self.polls.len() != before {
            info!("Removed poll {}", poll_id);
            self.publish();
        }
        Ok(())
    }

    /// Replace the cached poll with the same id, keeping its position
    ///
    /// A poll that isn't cached is not added.
    fn replace(&mut self, poll: Poll) -> Option<&Poll> {
        let Some(index) = self.polls.iter().position(|p| p.id == poll.id) else {
            warn!("Poll {} is not cached, ignoring server copy", poll.id);
            return None;
        };
        self.polls[index] = poll;
        self.publish();
        Some(&self.polls[index])
    }

    fn publish(&self) {
        self.changes.send_replace(self.polls.clone());
    }
}

/// The server must answer with the poll that was asked for
fn check_identity(requested: &Id, poll: &Poll) -> Result<(), NetworkError> {
    if &poll.id != requested {
        return Err(mismatch(
            requested,
            &format!("server answered with poll {}", poll.id),
        ));
    }
    Ok(())
}

fn mismatch(poll_id: &Id, details: &str) -> NetworkError {
    warn!("Rejecting response for poll {}: {}", poll_id, details);
    NetworkError::MalformedResponse {
        url: format!("poll:{}", poll_id),
        details: details.to_string(),
    }
}
