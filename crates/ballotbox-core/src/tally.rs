//! Vote-share statistics for display
//!
//! A [`Tally`] is derived from a poll's current vote counts. Percentages are
//! rounded to one decimal place per option and are not normalized, so they
//! may not add up to exactly 100.

use serde::Serialize;

use crate::models::{Id, Poll};

/// Bar colours, assigned by option position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarColor {
    Blue,
    Green,
    Purple,
    Pink,
    Orange,
}

impl BarColor {
    /// The fixed palette, in assignment order
    pub const PALETTE: [BarColor; 5] = [
        BarColor::Blue,
        BarColor::Green,
        BarColor::Purple,
        BarColor::Pink,
        BarColor::Orange,
    ];

    /// Colour for the option at `position`; independent of vote counts
    pub fn for_position(position: usize) -> Self {
        Self::PALETTE[position % Self::PALETTE.len()]
    }
}

/// One option's share of the vote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionShare {
    pub option_id: Id,
    pub text: String,
    pub votes: u64,
    /// Percentage of all votes, one decimal place
    pub percentage: f64,
    pub color: BarColor,
}

impl OptionShare {
    /// Text bar `width` cells wide, filled in proportion to the percentage
    pub fn bar(&self, width: usize) -> String {
        let filled = ((self.percentage / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
    }
}

/// Vote totals and per-option percentages for one poll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tally {
    pub total_votes: u64,
    pub options: Vec<OptionShare>,
}

impl Tally {
    /// Compute the tally for a poll
    pub fn of(poll: &Poll) -> Self {
        let total_votes = poll.total_votes();

        let options = poll
            .options
            .iter()
            .enumerate()
            .map(|(position, option)| OptionShare {
                option_id: option.id.clone(),
                text: option.text.clone(),
                votes: option.votes,
                percentage: percentage(option.votes, total_votes),
                color: BarColor::for_position(position),
            })
            .collect();

        Self {
            total_votes,
            options,
        }
    }

    /// Options holding the most votes (several on a tie, none without votes)
    pub fn leaders(&self) -> Vec<&OptionShare> {
        let Some(max) = self.options.iter().map(|o| o.votes).max() else {
            return Vec::new();
        };
        if max == 0 {
            return Vec::new();
        }
        self.options.iter().filter(|o| o.votes == max).collect()
    }
}

/// `votes / total * 100`, rounded to one decimal; zero when nobody voted
fn percentage(votes: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let share = votes as f64 / total as f64 * 100.0;
    (share * 10.0).round() / 10.0
}
