//! Ballot queries
//!
//! The `UNIQUE (poll_id, voter_id)` constraint on `ballots` is what keeps a
//! voter to one ballot per poll; `insert` translates its violation into
//! `DuplicateVote`.

use crate::timestamp;
use ballotbox_core::{
    error::{LedgerError, Result},
    types::{Ballot, CreateBallot, PollId, UserId},
};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn ballot_from_row(row: &SqliteRow) -> Ballot {
    Ballot {
        id: row.get("id"),
        poll_id: row.get("poll_id"),
        voter_id: row.get("voter_id"),
        option_index: row.get("option_index"),
        created_at: timestamp(row.get("created_at")),
    }
}

/// Insert a ballot
///
/// A second ballot for the same (poll, voter) fails with `DuplicateVote`
/// even when both inserts race. A ballot for a poll deleted in the meantime
/// fails with `NotFound` for the poll, one for an unknown voter with
/// `NotFound` for the user.
pub async fn insert(pool: &SqlitePool, ballot: CreateBallot) -> Result<Ballot> {
    let now = Utc::now().timestamp();

    let inserted = sqlx::query(
        "INSERT INTO ballots (poll_id, voter_id, option_index, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(ballot.poll_id)
    .bind(ballot.voter_id)
    .bind(ballot.option_index)
    .bind(now)
    .execute(pool)
    .await;

    let result = match inserted {
        Ok(result) => result,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(LedgerError::DuplicateVote {
                poll_id: ballot.poll_id,
                voter_id: ballot.voter_id,
            });
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
            // SQLite does not say which reference failed
            return Err(missing_reference(pool, &ballot).await);
        }
        Err(err) => return Err(err.into()),
    };

    Ok(Ballot {
        id: result.last_insert_rowid(),
        poll_id: ballot.poll_id,
        voter_id: ballot.voter_id,
        option_index: ballot.option_index,
        created_at: timestamp(now),
    })
}

/// Work out whether the poll or the voter behind a ballot is missing
async fn missing_reference(pool: &SqlitePool, ballot: &CreateBallot) -> LedgerError {
    let poll_exists = sqlx::query("SELECT 1 FROM polls WHERE id = ?")
        .bind(ballot.poll_id)
        .fetch_optional(pool)
        .await;

    match poll_exists {
        Ok(Some(_)) => LedgerError::not_found("User", ballot.voter_id),
        Ok(None) => LedgerError::poll_not_found(ballot.poll_id),
        Err(err) => err.into(),
    }
}

/// Find the ballot a voter cast in a poll
pub async fn find(pool: &SqlitePool, poll_id: PollId, voter_id: UserId) -> Result<Option<Ballot>> {
    let row = sqlx::query(
        "SELECT id, poll_id, voter_id, option_index, created_at
         FROM ballots WHERE poll_id = ? AND voter_id = ?",
    )
    .bind(poll_id)
    .bind(voter_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(ballot_from_row))
}

/// All ballots of a poll
pub async fn get_by_poll(pool: &SqlitePool, poll_id: PollId) -> Result<Vec<Ballot>> {
    let rows = sqlx::query(
        "SELECT id, poll_id, voter_id, option_index, created_at
         FROM ballots WHERE poll_id = ? ORDER BY id",
    )
    .bind(poll_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(ballot_from_row).collect())
}

/// Number of ballots in a poll
pub async fn count_by_poll(pool: &SqlitePool, poll_id: PollId) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM ballots WHERE poll_id = ?")
        .bind(poll_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get("count"))
}
