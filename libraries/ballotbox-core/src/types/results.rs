//! Tally result types

use super::poll::PollId;
use serde::{Deserialize, Serialize};

/// Ballot count and share for one option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionTally {
    pub label: String,
    pub count: u64,

    /// Share of all ballots, rounded to one decimal place
    pub percentage: f64,
}

/// Per-option breakdown of a poll, in option order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollResults {
    pub poll_id: PollId,
    pub total_ballots: u64,
    pub options: Vec<OptionTally>,
}

impl PollResults {
    /// Tally for the first option with the given label
    pub fn get(&self, label: &str) -> Option<&OptionTally> {
        self.options.iter().find(|t| t.label == label)
    }
}
