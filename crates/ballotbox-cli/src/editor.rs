//! Interactive editing support
//!
//! Opens $EDITOR on a plain-text rendering of a draft, and prompts for
//! confirmation before destructive actions.
//!
//! Draft text format:
//!
//! ```text
//! # Lines starting with '#' are ignored.
//! Best fruit?
//! - [#1] Apple
//! - [#2] Banana
//! - Cherry
//! ```
//!
//! The first non-comment line is the question; every `- ` line is an
//! option. A `[#id]` tag ties the line to an existing option so its votes
//! follow it; untagged lines are new options.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

use ballotbox_core::Draft;

/// Question and option texts parsed back from the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftText {
    pub question: String,
    pub options: Vec<OptionText>,
}

/// One option line, with the id tag it carried if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionText {
    pub id: Option<String>,
    pub text: String,
}

impl OptionText {
    /// Parse the part of an option line after the `- ` marker
    fn parse(line: &str) -> Self {
        if let Some((id, text)) = line.strip_prefix("[#").and_then(|rest| rest.split_once(']')) {
            return Self {
                id: Some(id.trim().to_string()),
                text: text.strip_prefix(' ').unwrap_or(text).to_string(),
            };
        }
        Self::from(line)
    }
}

impl From<&str> for OptionText {
    fn from(text: &str) -> Self {
        Self {
            id: None,
            text: text.to_string(),
        }
    }
}

/// Render a draft for editing
pub fn render_draft(draft: &Draft, heading: &str) -> String {
    let mut text = format!(
        "# {}\n\
         # First line is the question, each '- ' line is an option.\n\
         # Keep an option's [#id] tag to keep its votes; add new options untagged.\n\
         # Deleting a line removes that option. Blank options are dropped.\n",
        heading
    );
    text.push_str(&draft.question);
    text.push('\n');
    for option in &draft.options {
        text.push_str("- ");
        if let Some(ref id) = option.id {
            text.push_str(&format!("[#{}] ", id));
        }
        text.push_str(&option.text);
        text.push('\n');
    }
    text
}

/// Parse edited text back into question and options
pub fn parse_draft(content: &str) -> DraftText {
    let mut question: Option<String> = None;
    let mut options = Vec::new();

    for line in content.lines() {
        if line.trim_start().starts_with('#') {
            continue;
        }
        if let Some(option) = line.strip_prefix("- ").or_else(|| line.strip_prefix('-')) {
            options.push(OptionText::parse(option));
        } else if question.is_none() && !line.trim().is_empty() {
            question = Some(line.to_string());
        }
    }

    DraftText {
        question: question.unwrap_or_default(),
        options,
    }
}

/// Open content in the user's preferred editor
///
/// Uses $EDITOR, $VISUAL, or falls back to common editors.
pub fn edit_text(initial_content: &str) -> Result<String> {
    let editor = find_editor()?;

    let temp_dir = env::temp_dir();
    let temp_path = temp_dir.join(format!("ballot_edit_{}.txt", std::process::id()));

    fs::write(&temp_path, initial_content)
        .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;

    let status = Command::new(&editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;

    if !status.success() {
        let _ = fs::remove_file(&temp_path);
        bail!(
            "Editor '{}' exited with non-zero status. Check that your editor is configured correctly.",
            editor
        );
    }

    let content = fs::read_to_string(&temp_path)
        .with_context(|| format!("Failed to read edited file: {:?}", temp_path))?;

    let _ = fs::remove_file(&temp_path);

    Ok(content)
}

/// Find the user's preferred editor
fn find_editor() -> Result<String> {
    if let Ok(editor) = env::var("EDITOR") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    if let Ok(visual) = env::var("VISUAL") {
        if !visual.is_empty() {
            return Ok(visual);
        }
    }

    let common_editors = ["nano", "vim", "vi", "emacs"];

    for editor in common_editors {
        if command_exists(editor) {
            return Ok(editor.to_string());
        }
    }

    bail!(
        "No editor found. Set $EDITOR environment variable, or pass the poll on the command line.\n\
         Example: ballot create -Q \"Best fruit?\" -o Apple -o Banana"
    )
}

/// Check if a command exists in PATH
fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
