//! Poll queries
//!
//! Options are stored one row per label in `poll_options`, keyed by
//! `(poll_id, position)`, so a poll's option order is the position order.

use crate::timestamp;
use ballotbox_core::{error::Result, types::*};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;

fn poll_from_row(row: &SqliteRow, options: Vec<String>) -> Poll {
    Poll {
        id: row.get("id"),
        creator_id: row.get("creator_id"),
        title: row.get("title"),
        description: row.get("description"),
        options,
        is_active: row.get::<i64, _>("is_active") != 0,
        created_at: timestamp(row.get("created_at")),
    }
}

/// Option labels of one poll in position order
async fn get_options(pool: &SqlitePool, poll_id: PollId) -> Result<Vec<String>> {
    let rows = sqlx::query("SELECT label FROM poll_options WHERE poll_id = ? ORDER BY position")
        .bind(poll_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|row| row.get("label")).collect())
}

/// Load polls matching `filter` along with their options
async fn get_where(pool: &SqlitePool, filter: &str) -> Result<Vec<Poll>> {
    let poll_sql = format!(
        "SELECT id, creator_id, title, description, is_active, created_at
         FROM polls {} ORDER BY id",
        filter
    );
    let option_sql = format!(
        "SELECT poll_id, label FROM poll_options
         WHERE poll_id IN (SELECT id FROM polls {})
         ORDER BY poll_id, position",
        filter
    );

    // One read transaction so both queries see the same snapshot
    let mut tx = pool.begin().await?;
    let poll_rows = sqlx::query(&poll_sql).fetch_all(&mut *tx).await?;
    let option_rows = sqlx::query(&option_sql).fetch_all(&mut *tx).await?;
    tx.commit().await?;

    let mut options: HashMap<PollId, Vec<String>> = HashMap::new();
    for row in option_rows {
        options
            .entry(row.get("poll_id"))
            .or_default()
            .push(row.get("label"));
    }

    Ok(poll_rows
        .iter()
        .map(|row| {
            let id: PollId = row.get("id");
            poll_from_row(row, options.remove(&id).unwrap_or_default())
        })
        .collect())
}

/// Get poll by ID
pub async fn get_by_id(pool: &SqlitePool, id: PollId) -> Result<Option<Poll>> {
    let row = sqlx::query(
        "SELECT id, creator_id, title, description, is_active, created_at FROM polls WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let options = get_options(pool, id).await?;
    Ok(Some(poll_from_row(&row, options)))
}

/// Active polls in creation order
pub async fn get_active(pool: &SqlitePool) -> Result<Vec<Poll>> {
    get_where(pool, "WHERE is_active = 1").await
}

/// All polls in creation order
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Poll>> {
    get_where(pool, "").await
}

/// Create a poll and its options in one transaction
pub async fn create(pool: &SqlitePool, poll: CreatePoll) -> Result<Poll> {
    let now = Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO polls (creator_id, title, description, is_active, created_at)
        VALUES (?, ?, ?, 1, ?)
        "#,
    )
    .bind(poll.creator_id)
    .bind(&poll.title)
    .bind(&poll.description)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let id = result.last_insert_rowid();

    for (position, label) in poll.options.iter().enumerate() {
        sqlx::query("INSERT INTO poll_options (poll_id, position, label) VALUES (?, ?, ?)")
            .bind(id)
            .bind(position as i64)
            .bind(label)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(Poll {
        id,
        creator_id: poll.creator_id,
        title: poll.title,
        description: poll.description,
        options: poll.options,
        is_active: true,
        created_at: timestamp(now),
    })
}

/// Set the active flag
///
/// Returns false if no poll has this ID. Setting the current value again
/// still counts as a match.
pub async fn set_active(pool: &SqlitePool, id: PollId, active: bool) -> Result<bool> {
    let result = sqlx::query("UPDATE polls SET is_active = ? WHERE id = ?")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a poll, its options and its ballots in one transaction
///
/// Returns false if no poll has this ID.
pub async fn delete(pool: &SqlitePool, id: PollId) -> Result<bool> {
    let mut tx = pool.begin().await?;

    // Ballots reference the poll row, so they go first
    let ballots = sqlx::query("DELETE FROM ballots WHERE poll_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM poll_options WHERE poll_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM polls WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let deleted = result.rows_affected() > 0;
    if deleted {
        tracing::debug!(
            poll_id = id,
            ballots = ballots.rows_affected(),
            "Deleted poll with its ballots"
        );
    }

    Ok(deleted)
}
