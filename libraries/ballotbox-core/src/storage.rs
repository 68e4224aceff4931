//! Storage collaborator contract
//!
//! The ledger owns the voting rules; implementers own durability. Two
//! guarantees are required of every implementation:
//!
//! - `insert_ballot` must reject a second ballot for the same
//!   (poll, voter) pair atomically, reporting [`LedgerError::DuplicateVote`].
//!   An application-level check is not enough under concurrent callers.
//! - `delete_poll` must remove the poll and all of its ballots as one unit.
//!
//! [`LedgerError::DuplicateVote`]: crate::error::LedgerError::DuplicateVote

use crate::error::Result;
use crate::types::{
    Ballot, CreateBallot, CreatePoll, CreateUser, Poll, PollId, User, UserCredentials, UserId,
};
use async_trait::async_trait;

/// Persistence for users, polls and ballots
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    // ========================================================================
    // Users
    // ========================================================================

    /// Create a user and store its credential hash
    ///
    /// Fails with `DuplicateLogin` or `DuplicateEmail` on a uniqueness clash.
    async fn create_user(&self, user: CreateUser) -> Result<User>;

    /// Get user by ID
    async fn get_user(&self, id: UserId) -> Result<Option<User>>;

    /// Look up a user and its credential hash by login
    async fn find_credentials(&self, login: &str) -> Result<Option<UserCredentials>>;

    /// Get all users
    async fn get_all_users(&self) -> Result<Vec<User>>;

    /// Number of registered users
    async fn count_users(&self) -> Result<i64>;

    // ========================================================================
    // Polls
    // ========================================================================

    /// Create a new active poll with its ordered options
    async fn create_poll(&self, poll: CreatePoll) -> Result<Poll>;

    /// Get poll by ID
    async fn get_poll(&self, id: PollId) -> Result<Option<Poll>>;

    /// Active polls in insertion order
    async fn get_active_polls(&self) -> Result<Vec<Poll>>;

    /// All polls in insertion order
    async fn get_all_polls(&self) -> Result<Vec<Poll>>;

    /// Set the active flag; returns false if the poll does not exist
    async fn set_poll_active(&self, id: PollId, active: bool) -> Result<bool>;

    /// Delete a poll and its ballots atomically; returns false if the poll
    /// does not exist
    async fn delete_poll(&self, id: PollId) -> Result<bool>;

    // ========================================================================
    // Ballots
    // ========================================================================

    /// Insert a ballot, rejecting a second one for the same (poll, voter)
    async fn insert_ballot(&self, ballot: CreateBallot) -> Result<Ballot>;

    /// Find the ballot a voter cast in a poll
    async fn find_ballot(&self, poll_id: PollId, voter_id: UserId) -> Result<Option<Ballot>>;

    /// All ballots of a poll
    async fn get_poll_ballots(&self, poll_id: PollId) -> Result<Vec<Ballot>>;
}
