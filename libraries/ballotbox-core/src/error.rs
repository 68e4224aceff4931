/// Core error types for Ballotbox
use crate::types::{PollId, UserId};
use thiserror::Error;

/// Result type alias using `LedgerError`
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Core error type for Ballotbox
///
/// Every variant is recoverable; the web layer picks the message shown to
/// the user.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Bad input shape
    #[error("Validation error: {0}")]
    Validation(String),

    /// Selected option is not an index into the poll's options
    #[error("Invalid option {option} for poll {poll_id}")]
    InvalidOption { poll_id: PollId, option: String },

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Poll no longer accepts ballots
    #[error("Poll {0} is closed")]
    ClosedPoll(PollId),

    /// A ballot already exists for this (poll, voter) pair
    #[error("User {voter_id} has already voted in poll {poll_id}")]
    DuplicateVote { poll_id: PollId, voter_id: UserId },

    /// Login already taken
    #[error("Login already exists: {0}")]
    DuplicateLogin(String),

    /// Email already registered
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Authorization failure
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad credentials
    #[error("Invalid login or password")]
    Auth,

    /// Storage-layer failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a poll not found error
    pub fn poll_not_found(id: PollId) -> Self {
        Self::not_found("Poll", id)
    }

    /// Create an invalid option error
    pub fn invalid_option(poll_id: PollId, option: impl ToString) -> Self {
        Self::InvalidOption {
            poll_id,
            option: option.to_string(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity() {
        let err = LedgerError::poll_not_found(42);
        assert_eq!(err.to_string(), "Poll not found: 42");
    }

    #[test]
    fn duplicate_vote_message() {
        let err = LedgerError::DuplicateVote {
            poll_id: 3,
            voter_id: 9,
        };
        assert_eq!(err.to_string(), "User 9 has already voted in poll 3");
    }
}
