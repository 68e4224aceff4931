//! Poll types

use super::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PollId = i64;

/// A titled question with an immutable, ordered list of options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub id: PollId,
    pub creator_id: UserId,
    pub title: String,
    pub description: Option<String>,

    /// Option labels in creation order; a ballot refers to one by index
    pub options: Vec<String>,

    /// Whether the poll still accepts ballots
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Poll {
    /// Label at `index`, if the index is valid for this poll
    pub fn option(&self, index: i64) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }
}

/// Data for creating a new poll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePoll {
    pub creator_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub options: Vec<String>,
}
