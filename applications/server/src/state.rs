/// Shared application state
use crate::services::AuthService;
use ballotbox_core::{LedgerStore, VotingLedger};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<VotingLedger>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(ledger: Arc<VotingLedger>, auth_service: Arc<AuthService>) -> Self {
        Self {
            ledger,
            auth_service,
        }
    }

    /// Storage behind the ledger, for account operations
    pub fn store(&self) -> &dyn LedgerStore {
        self.ledger.store().as_ref()
    }
}
