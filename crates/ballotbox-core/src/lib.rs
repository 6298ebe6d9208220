//! ballotbox Core Library
//!
//! This crate provides the client-side poll state manager for ballotbox:
//! a local cache of polls kept in step with a remote Poll Service, an
//! editor for poll drafts, and vote-share statistics.
//!
//! # Architecture
//!
//! - **Poll Service** (remote): source of truth for polls and vote counts
//! - **PollStore**: local cache, changed only by successful service calls
//! - **DraftEditor**: the question and options being composed or edited
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut store = PollStore::new(HttpPollService::new(&config)?);
//! store.refresh().await?;
//!
//! let mut editor = DraftEditor::new();
//! editor.set_question("Best fruit?");
//! editor.set_option_text(0, "Apple")?;
//! editor.set_option_text(1, "Banana")?;
//! store.create(&mut editor).await?;
//!
//! for poll in store.list() {
//!     let tally = Tally::of(poll);
//! }
//! ```
//!
//! # Modules
//!
//! - `store`: Poll cache (main entry point)
//! - `draft`: Draft editor and edit session
//! - `models`: Polls, options and drafts
//! - `sync`: Poll Service trait and HTTP client
//! - `tally`: Vote totals, percentages and bar colours
//! - `error`: Error types
//! - `config`: Application configuration

pub mod config;
pub mod draft;
pub mod error;
pub mod models;
pub mod store;
pub mod sync;
pub mod tally;

pub use config::Config;
pub use draft::{DraftEditor, EditSession, ValidDraft};
pub use error::{IndexError, NetworkError, PollError, ValidationError};
pub use models::{Draft, DraftOption, Id, Poll, PollOption};
pub use store::PollStore;
pub use sync::{HttpPollService, PollService};
pub use tally::{BarColor, OptionShare, Tally};
