//! Draft editor
//!
//! Owns the question and options being composed (or edited) before they are
//! handed to the [`PollStore`](crate::PollStore). The editor always holds
//! exactly one live draft, paired with the session that says what a
//! submission means.
//!
//! ```ignore
//! let mut editor = DraftEditor::new();
//! editor.set_question("Best fruit?");
//! editor.set_option_text(0, "Apple")?;
//! editor.set_option_text(1, "Banana")?;
//! let valid = editor.validate()?;
//! ```

use tracing::debug;

use crate::error::{IndexError, ValidationError};
use crate::models::{Draft, DraftOption, Id, Poll, MIN_OPTIONS};
use crate::sync::{CreatePollRequest, OptionPayload, UpdatePollRequest};

/// What submitting the current draft means
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditSession {
    /// Composing a new poll (also the idle state)
    #[default]
    Create,
    /// Editing the poll with this id
    Edit(Id),
}

/// A cleaned draft, ready to be sent to the Poll Service
///
/// Question and texts are trimmed and blank options are dropped; at least
/// two options remain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub question: String,
    pub options: Vec<DraftOption>,
}

impl ValidDraft {
    /// Request body for a new poll (ids are never sent on create)
    pub fn into_create_request(self) -> CreatePollRequest {
        CreatePollRequest {
            question: self.question,
            options: self
                .options
                .into_iter()
                .map(|o| OptionPayload {
                    id: None,
                    text: o.text,
                })
                .collect(),
        }
    }

    /// Request body for an update; options from the original poll keep their id
    pub fn into_update_request(self) -> UpdatePollRequest {
        UpdatePollRequest {
            question: self.question,
            options: self
                .options
                .into_iter()
                .map(|o| OptionPayload {
                    id: o.id,
                    text: o.text,
                })
                .collect(),
        }
    }
}

/// Editor for the single live draft
#[derive(Debug, Clone, Default)]
pub struct DraftEditor {
    draft: Draft,
    session: EditSession,
}

impl DraftEditor {
    /// Create an editor holding a blank draft
    pub fn new() -> Self {
        Self::default()
    }

    /// The current draft
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// The current session
    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Whether an existing poll is being edited
    pub fn is_editing(&self) -> bool {
        matches!(self.session, EditSession::Edit(_))
    }

    /// Start composing a new poll with two blank options
    pub fn begin_create(&mut self) {
        self.draft = Draft::default();
        self.session = EditSession::Create;
    }

    /// Start editing an existing poll
    ///
    /// Copies the question and each option's id and text, in order.
    pub fn begin_edit(&mut self, poll: &Poll) {
        debug!("Editing poll {}", poll.id);
        self.draft = Draft::from(poll);
        self.session = EditSession::Edit(poll.id.clone());
    }

    /// Replace the question verbatim
    pub fn set_question(&mut self, text: impl Into<String>) {
        self.draft.question = text.into();
    }

    /// Replace the text of the option at `index`, keeping its id
    pub fn set_option_text(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), IndexError> {
        let len = self.draft.options.len();
        let option = self
            .draft
            .options
            .get_mut(index)
            .ok_or(IndexError { index, len })?;
        option.text = text.into();
        Ok(())
    }

    /// Append a blank option without an id
    pub fn append_option(&mut self) {
        self.draft.options.push(DraftOption::blank());
    }

    /// Remove the option at `index`
    ///
    /// The first two positions are never removed, and indexes past the end
    /// are ignored. Returns whether an option was removed.
    pub fn remove_option(&mut self, index: usize) -> bool {
        if index < MIN_OPTIONS || index >= self.draft.options.len() {
            return false;
        }
        self.draft.options.remove(index);
        true
    }

    /// Trim the draft and check it can be submitted
    ///
    /// Options whose trimmed text is empty are dropped rather than rejected,
    /// so placeholder blanks are allowed.
    pub fn validate(&self) -> Result<ValidDraft, ValidationError> {
        let question = self.draft.question.trim();
        if question.is_empty() {
            return Err(ValidationError::MissingQuestion);
        }

        let options: Vec<DraftOption> = self
            .draft
            .options
            .iter()
            .filter_map(|o| {
                let text = o.text.trim();
                (!text.is_empty()).then(|| DraftOption {
                    id: o.id.clone(),
                    text: text.to_string(),
                })
            })
            .collect();

        if options.len() < MIN_OPTIONS {
            return Err(ValidationError::InsufficientOptions);
        }

        Ok(ValidDraft {
            question: question.to_string(),
            options,
        })
    }

    /// Discard the draft and return to composing a new poll
    pub fn cancel(&mut self) {
        if let EditSession::Edit(ref id) = self.session {
            debug!("Cancelled edit of poll {}", id);
        }
        self.begin_create();
    }
}
