//! Ballotbox Storage
//!
//! `SQLite` database layer for Ballotbox.
//!
//! This crate provides persistent storage for users, polls and ballots and
//! implements the [`LedgerStore`](ballotbox_core::LedgerStore) contract on
//! top of it.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each entity owns its own queries (`users`, `polls`,
//!   `ballots`)
//! - **Constraints in the schema**: one ballot per (poll, voter) is a `UNIQUE`
//!   constraint, not an application check
//! - **Transactions**: poll creation and deletion are single transactions
//!
//! # Example
//!
//! ```rust,no_run
//! use ballotbox_storage::{create_pool, run_migrations, SqliteLedgerStore};
//! use ballotbox_core::LedgerStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://ballotbox.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteLedgerStore::new(pool);
//! let polls = store.get_active_polls().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod ballots;
pub mod polls;
pub mod users;

pub use context::SqliteLedgerStore;
pub use error::StorageError;

use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    tracing::debug!("Database migrations applied");
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://ballotbox.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        .foreign_keys(true)
        // WAL lets readers proceed while a ballot insert holds the write lock
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    tracing::info!("Database pool ready");

    Ok(pool)
}

/// Convert a stored unix timestamp
pub(crate) fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}
