//! Voting ledger
//!
//! Enforces the poll and ballot invariants on top of a [`LedgerStore`] and
//! computes result tallies. Identity is always an explicit argument; the
//! ledger holds no per-request state.

use crate::error::{LedgerError, Result};
use crate::storage::LedgerStore;
use crate::tally;
use crate::types::{Ballot, CreateBallot, CreatePoll, Identity, Poll, PollId, PollResults, UserId};
use std::sync::Arc;

/// Minimum number of non-blank options a poll must have
pub const MIN_OPTIONS: usize = 2;

/// Poll and ballot rules over a storage backend
#[derive(Clone)]
pub struct VotingLedger {
    store: Arc<dyn LedgerStore>,
}

impl VotingLedger {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Underlying storage
    pub fn store(&self) -> &Arc<dyn LedgerStore> {
        &self.store
    }

    /// Drop blank entries and trim the rest, keeping the given order
    ///
    /// Fails if fewer than [`MIN_OPTIONS`] labels remain. Duplicate labels are
    /// allowed.
    pub fn normalize_options(options: &[String]) -> Result<Vec<String>> {
        let options: Vec<String> = options
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_owned)
            .collect();

        if options.len() < MIN_OPTIONS {
            return Err(LedgerError::validation("minimum two options"));
        }

        Ok(options)
    }

    /// Parse a user-supplied option value into an index
    ///
    /// Anything that is not an integer is an `InvalidOption`; range checking
    /// happens in [`cast_ballot`](Self::cast_ballot).
    pub fn parse_option(poll_id: PollId, raw: &str) -> Result<i64> {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| LedgerError::invalid_option(poll_id, raw))
    }

    /// Create a new active poll
    pub async fn create_poll(
        &self,
        creator_id: UserId,
        title: impl Into<String>,
        description: Option<String>,
        options: &[String],
    ) -> Result<Poll> {
        let options = Self::normalize_options(options)?;
        let description = description.filter(|d| !d.trim().is_empty());

        let poll = self
            .store
            .create_poll(CreatePoll {
                creator_id,
                title: title.into(),
                description,
                options,
            })
            .await?;

        tracing::info!(
            poll_id = poll.id,
            creator_id,
            options = poll.options.len(),
            "Poll created"
        );

        Ok(poll)
    }

    /// Get a poll by ID
    pub async fn get_poll(&self, poll_id: PollId) -> Result<Poll> {
        self.store
            .get_poll(poll_id)
            .await?
            .ok_or_else(|| LedgerError::poll_not_found(poll_id))
    }

    /// Cast a ballot
    ///
    /// Checks run in order: poll exists, poll is active, voter has not voted,
    /// option index is in range. The duplicate check here only produces a
    /// friendly early error; the store's uniqueness constraint decides races.
    pub async fn cast_ballot(
        &self,
        poll_id: PollId,
        voter_id: UserId,
        option_index: i64,
    ) -> Result<Ballot> {
        let poll = self.get_poll(poll_id).await?;

        if !poll.is_active {
            tracing::debug!(poll_id, voter_id, "Ballot rejected: poll closed");
            return Err(LedgerError::ClosedPoll(poll_id));
        }

        if self.store.find_ballot(poll_id, voter_id).await?.is_some() {
            tracing::debug!(poll_id, voter_id, "Ballot rejected: already voted");
            return Err(LedgerError::DuplicateVote { poll_id, voter_id });
        }

        if poll.option(option_index).is_none() {
            return Err(LedgerError::invalid_option(poll_id, option_index));
        }

        match self
            .store
            .insert_ballot(CreateBallot {
                poll_id,
                voter_id,
                option_index,
            })
            .await
        {
            Ok(ballot) => {
                tracing::info!(poll_id, voter_id, option_index, "Ballot cast");
                Ok(ballot)
            }
            Err(err @ LedgerError::DuplicateVote { .. }) => {
                tracing::warn!(poll_id, voter_id, "Concurrent duplicate ballot rejected by store");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Whether `voter_id` has a ballot in `poll_id`
    pub async fn has_voted(&self, poll_id: PollId, voter_id: UserId) -> Result<bool> {
        Ok(self.store.find_ballot(poll_id, voter_id).await?.is_some())
    }

    /// Per-option counts and percentages, read fresh from storage
    pub async fn compute_results(&self, poll_id: PollId) -> Result<PollResults> {
        let poll = self.get_poll(poll_id).await?;
        let ballots = self.store.get_poll_ballots(poll_id).await?;

        Ok(tally::tally(&poll, &ballots))
    }

    /// Stop a poll from accepting ballots (admin only, idempotent)
    pub async fn close_poll(&self, identity: &Identity, poll_id: PollId) -> Result<()> {
        require_admin(identity, "close polls")?;

        if !self.store.set_poll_active(poll_id, false).await? {
            return Err(LedgerError::poll_not_found(poll_id));
        }

        tracing::info!(poll_id, admin_id = identity.user_id, "Poll closed");
        Ok(())
    }

    /// Delete a poll together with all of its ballots (admin only)
    pub async fn delete_poll(&self, identity: &Identity, poll_id: PollId) -> Result<()> {
        require_admin(identity, "delete polls")?;

        if !self.store.delete_poll(poll_id).await? {
            return Err(LedgerError::poll_not_found(poll_id));
        }

        tracing::info!(poll_id, admin_id = identity.user_id, "Poll deleted");
        Ok(())
    }

    /// Polls still accepting ballots, in creation order
    pub async fn list_active_polls(&self) -> Result<Vec<Poll>> {
        self.store.get_active_polls().await
    }

    /// Every poll, active or closed (admin only)
    pub async fn list_all_polls(&self, identity: &Identity) -> Result<Vec<Poll>> {
        require_admin(identity, "manage polls")?;
        self.store.get_all_polls().await
    }
}

fn require_admin(identity: &Identity, action: &str) -> Result<()> {
    if identity.is_admin {
        Ok(())
    } else {
        tracing::debug!(user_id = identity.user_id, action, "Admin check failed");
        Err(LedgerError::forbidden(format!("only admins may {}", action)))
    }
}
