//! Ballotbox Core
//!
//! Storage-agnostic domain types, the voting ledger, and error handling for
//! Ballotbox.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Poll`, `Ballot`, `PollResults`, `Identity`
//! - **Storage Contract**: the `LedgerStore` trait
//! - **Ledger**: `VotingLedger`, which enforces one ballot per voter per poll
//!   and computes tallies
//! - **Error Handling**: unified `LedgerError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use ballotbox_core::{tally, Poll};
//! use chrono::Utc;
//!
//! let poll = Poll {
//!     id: 1,
//!     creator_id: 1,
//!     title: "Tabs or spaces?".to_string(),
//!     description: None,
//!     options: vec!["Tabs".to_string(), "Spaces".to_string()],
//!     is_active: true,
//!     created_at: Utc::now(),
//! };
//!
//! let results = tally::tally(&poll, &[]);
//! assert_eq!(results.total_ballots, 0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod ledger;
pub mod storage;
pub mod tally;
pub mod types;

// Re-export commonly used types
pub use error::{LedgerError, Result};
pub use ledger::VotingLedger;
pub use storage::LedgerStore;

pub use types::{
    Ballot, BallotId, CreateBallot, CreatePoll, CreateUser, Identity, OptionTally, Poll, PollId,
    PollResults, User, UserCredentials, UserId,
};
