//! Ballotbox Server Library
//!
//! JSON HTTP front end for the voting ledger: registration, token-based
//! login, poll endpoints and poll administration.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use routes::create_router;
pub use services::auth::AuthService;
pub use state::AppState;
