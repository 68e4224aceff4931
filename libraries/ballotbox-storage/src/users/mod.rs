//! User management and authentication queries

use crate::timestamp;
use ballotbox_core::{
    error::{LedgerError, Result},
    types::{CreateUser, User, UserCredentials, UserId},
};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        login: row.get("login"),
        email: row.get("email"),
        is_admin: row.get::<i64, _>("is_admin") != 0,
        created_at: timestamp(row.get("created_at")),
    }
}

/// Map a uniqueness clash on `users` to the matching ledger error
fn duplicate_user_error(err: sqlx::Error, user: &CreateUser) -> LedgerError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return if db_err.message().contains("users.email") {
                LedgerError::DuplicateEmail(user.email.clone())
            } else {
                LedgerError::DuplicateLogin(user.login.clone())
            };
        }
    }
    err.into()
}

/// Create a user together with its credentials
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `user` - New user; `password_hash` should already be hashed with bcrypt
pub async fn create(pool: &SqlitePool, user: CreateUser) -> Result<User> {
    let now = Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO users (login, email, is_admin, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&user.login)
    .bind(&user.email)
    .bind(user.is_admin)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|err| duplicate_user_error(err, &user))?;

    let id = result.last_insert_rowid();

    sqlx::query(
        "INSERT INTO user_credentials (user_id, password_hash, updated_at) VALUES (?, ?, ?)",
    )
    .bind(id)
    .bind(&user.password_hash)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(User {
        id,
        login: user.login,
        email: user.email,
        is_admin: user.is_admin,
        created_at: timestamp(now),
    })
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, login, email, is_admin, created_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(user_from_row))
}

/// Look up a user and its password hash by login
pub async fn find_credentials(
    pool: &SqlitePool,
    login: &str,
) -> Result<Option<UserCredentials>> {
    let row = sqlx::query(
        r#"
        SELECT u.id, u.login, u.email, u.is_admin, u.created_at, c.password_hash
        FROM users u
        INNER JOIN user_credentials c ON c.user_id = u.id
        WHERE u.login = ?
        "#,
    )
    .bind(login)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| UserCredentials {
        user: user_from_row(&row),
        password_hash: row.get("password_hash"),
    }))
}

/// Get user's password hash
///
/// Returns None if the user has no credentials
pub async fn get_password_hash(pool: &SqlitePool, user_id: UserId) -> Result<Option<String>> {
    let row = sqlx::query("SELECT password_hash FROM user_credentials WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.get("password_hash")))
}

/// Create or update user credentials
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `user_id` - User ID
/// * `password_hash` - Hashed password (should already be hashed with bcrypt)
pub async fn set_password_hash(
    pool: &SqlitePool,
    user_id: UserId,
    password_hash: &str,
) -> Result<()> {
    let result = sqlx::query(
        "INSERT INTO user_credentials (user_id, password_hash, updated_at)
         SELECT id, ?, ? FROM users WHERE id = ?
         ON CONFLICT(user_id)
         DO UPDATE SET password_hash = excluded.password_hash, updated_at = excluded.updated_at",
    )
    .bind(password_hash)
    .bind(Utc::now().timestamp())
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(LedgerError::not_found("User", user_id));
    }

    Ok(())
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query("SELECT id, login, email, is_admin, created_at FROM users ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(user_from_row).collect())
}

/// Number of registered users
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM users")
        .fetch_one(pool)
        .await?;

    Ok(row.get("count"))
}
