use crate::{ballots, polls, users};
use async_trait::async_trait;
use ballotbox_core::{error::Result, storage::LedgerStore, types::*};
use sqlx::SqlitePool;

/// `LedgerStore` backed by `SQLite`
#[derive(Clone)]
pub struct SqliteLedgerStore {
    pool: SqlitePool,
}

impl SqliteLedgerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl LedgerStore for SqliteLedgerStore {
    // Users
    async fn create_user(&self, user: CreateUser) -> Result<User> {
        users::create(&self.pool, user).await
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        users::get_by_id(&self.pool, id).await
    }

    async fn find_credentials(&self, login: &str) -> Result<Option<UserCredentials>> {
        users::find_credentials(&self.pool, login).await
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        users::get_all(&self.pool).await
    }

    async fn count_users(&self) -> Result<i64> {
        users::count(&self.pool).await
    }

    // Polls
    async fn create_poll(&self, poll: CreatePoll) -> Result<Poll> {
        polls::create(&self.pool, poll).await
    }

    async fn get_poll(&self, id: PollId) -> Result<Option<Poll>> {
        polls::get_by_id(&self.pool, id).await
    }

    async fn get_active_polls(&self) -> Result<Vec<Poll>> {
        polls::get_active(&self.pool).await
    }

    async fn get_all_polls(&self) -> Result<Vec<Poll>> {
        polls::get_all(&self.pool).await
    }

    async fn set_poll_active(&self, id: PollId, active: bool) -> Result<bool> {
        polls::set_active(&self.pool, id, active).await
    }

    async fn delete_poll(&self, id: PollId) -> Result<bool> {
        polls::delete(&self.pool, id).await
    }

    // Ballots
    async fn insert_ballot(&self, ballot: CreateBallot) -> Result<Ballot> {
        ballots::insert(&self.pool, ballot).await
    }

    async fn find_ballot(&self, poll_id: PollId, voter_id: UserId) -> Result<Option<Ballot>> {
        ballots::find(&self.pool, poll_id, voter_id).await
    }

    async fn get_poll_ballots(&self, poll_id: PollId) -> Result<Vec<Ballot>> {
        ballots::get_by_poll(&self.pool, poll_id).await
    }
}
