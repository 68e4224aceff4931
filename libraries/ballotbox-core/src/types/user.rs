/// User domain type
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// User account
///
/// The credential hash is deliberately not part of this record; it is only
/// ever loaded through [`UserCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Unique login name
    pub login: String,

    /// Unique email address
    pub email: String,

    /// Whether the user may close and delete polls
    pub is_admin: bool,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new user
///
/// `password_hash` must already be hashed; storage never sees plaintext.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub login: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// A user together with its stored credential hash
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}
