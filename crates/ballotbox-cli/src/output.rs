//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use ballotbox_core::{Poll, Tally};

/// Width of the result bars in human output
const BAR_WIDTH: usize = 20;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single poll with its results
    pub fn print_poll(&self, poll: &Poll) {
        match self.format {
            OutputFormat::Human => {
                for line in poll_lines(poll) {
                    println!("{}", line);
                }
            }
            OutputFormat::Json => {
                println!("{}", poll_json(poll));
            }
            OutputFormat::Quiet => {
                println!("{}", poll.id);
            }
        }
    }

    /// Print a list of polls
    pub fn print_polls(&self, polls: &[Poll]) {
        match self.format {
            OutputFormat::Human => {
                if polls.is_empty() {
                    println!("No polls created yet.");
                    return;
                }
                for poll in polls {
                    for line in poll_lines(poll) {
                        println!("{}", line);
                    }
                    println!();
                }
                println!("{} poll(s)", polls.len());
            }
            OutputFormat::Json => {
                let items: Vec<_> = polls.iter().map(poll_json).collect();
                println!("{}", serde_json::Value::Array(items));
            }
            OutputFormat::Quiet => {
                for poll in polls {
                    println!("{}", poll.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Poll plus its tally as a JSON value
fn poll_json(poll: &Poll) -> serde_json::Value {
    serde_json::json!({
        "id": poll.id,
        "question": poll.question,
        "options": poll.options,
        "tally": Tally::of(poll),
    })
}

/// Human-readable lines for one poll
fn poll_lines(poll: &Poll) -> Vec<String> {
    let tally = Tally::of(poll);
    let text_width = tally
        .options
        .iter()
        .map(|o| o.text.chars().count())
        .max()
        .unwrap_or(0)
        .min(30);

    let mut lines = vec![format!("[{}] {}", poll.id, poll.question)];
    for (position, share) in tally.options.iter().enumerate() {
        lines.push(format!(
            "  {:>2}. {:<width$}  {} {:>5.1}%  ({} vote{})  #{}",
            position + 1,
            truncate(&share.text, 30),
            share.bar(BAR_WIDTH),
            share.percentage,
            share.votes,
            if share.votes == 1 { "" } else { "s" },
            share.option_id,
            width = text_width
        ));
    }
    lines.push(format!("  Total votes: {}", tally.total_votes));
    lines
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
