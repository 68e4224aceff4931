//! Ballot types

use super::poll::PollId;
use super::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type BallotId = i64;

/// One user's single, immutable vote on one poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub id: BallotId,
    pub poll_id: PollId,
    pub voter_id: UserId,

    /// 0-based index into the poll's options
    pub option_index: i64,
    pub created_at: DateTime<Utc>,
}

/// Data for inserting a ballot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateBallot {
    pub poll_id: PollId,
    pub voter_id: UserId,
    pub option_index: i64,
}
