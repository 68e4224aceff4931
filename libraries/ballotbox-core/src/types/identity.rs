//! Caller identity handed to authorization-sensitive ledger operations

use super::user::UserId;
use serde::{Deserialize, Serialize};

/// Authenticated caller, supplied by the web layer on every call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub is_admin: bool,
}

impl Identity {
    pub fn new(user_id: UserId, is_admin: bool) -> Self {
        Self { user_id, is_admin }
    }

    /// Identity of a regular (non-admin) user
    pub fn user(user_id: UserId) -> Self {
        Self::new(user_id, false)
    }

    /// Identity of an administrator
    pub fn admin(user_id: UserId) -> Self {
        Self::new(user_id, true)
    }
}
