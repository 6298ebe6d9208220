//! Data models for ballotbox
//!
//! Defines the polls cached from the Poll Service and the drafts users
//! compose locally. Server-assigned ids are opaque and never mutated here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the Poll Service
///
/// Backends hand out either numeric or string ids. The original form is kept
/// so that ids are sent back to the server exactly as they were received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(u64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Id::Number(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::Text(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::Text(s)
    }
}

/// One voteable choice within a persisted poll
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollOption {
    /// Server-assigned identifier
    #[serde(alias = "_id")]
    pub id: Id,
    /// Display text
    pub text: String,
    /// Server-authoritative vote count
    pub votes: u64,
}

/// A persisted poll as returned by the Poll Service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Poll {
    /// Server-assigned identifier
    #[serde(alias = "_id")]
    pub id: Id,
    /// The poll question
    pub question: String,
    /// Options in display order
    pub options: Vec<PollOption>,
}

/// Minimum number of options every poll and draft carries
pub const MIN_OPTIONS: usize = 2;

impl Poll {
    /// Total number of votes across all options
    ///
    /// Saturates at `u64::MAX`; `check_shape` rejects polls that get there.
    pub fn total_votes(&self) -> u64 {
        self.options
            .iter()
            .fold(0u64, |total, o| total.saturating_add(o.votes))
    }

    /// Find an option by its id
    pub fn option(&self, id: &Id) -> Option<&PollOption> {
        self.options.iter().find(|o| &o.id == id)
    }

    /// Check the structural rules a poll from the server must satisfy
    ///
    /// Returns a description of the first violation found.
    pub fn check_shape(&self) -> Result<(), String> {
        if self.options.len() < MIN_OPTIONS {
            return Err(format!(
                "poll {} has {} option(s), expected at least {}",
                self.id,
                self.options.len(),
                MIN_OPTIONS
            ));
        }
        for (i, option) in self.options.iter().enumerate() {
            if self.options[..i].iter().any(|o| o.id == option.id) {
                return Err(format!(
                    "poll {} has duplicate option id {}",
                    self.id, option.id
                ));
            }
        }
        if self
            .options
            .iter()
            .try_fold(0u64, |total, o| total.checked_add(o.votes))
            .is_none()
        {
            return Err(format!("poll {} vote counts overflow", self.id));
        }
        Ok(())
    }
}

/// An option inside a draft
///
/// `id` is set when the option came from an existing poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftOption {
    pub id: Option<Id>,
    pub text: String,
}

impl DraftOption {
    /// A new, blank option with no id
    pub fn blank() -> Self {
        Self::default()
    }
}

impl From<&PollOption> for DraftOption {
    fn from(option: &PollOption) -> Self {
        Self {
            id: Some(option.id.clone()),
            text: option.text.clone(),
        }
    }
}

/// The in-progress, unpersisted question and options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub question: String,
    pub options: Vec<DraftOption>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            question: String::new(),
            options: vec![DraftOption::blank(); MIN_OPTIONS],
        }
    }
}

impl From<&Poll> for Draft {
    fn from(poll: &Poll) -> Self {
        Self {
            question: poll.question.clone(),
            options: poll.options.iter().map(DraftOption::from).collect(),
        }
    }
}
