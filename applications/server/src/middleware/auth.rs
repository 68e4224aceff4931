/// Authentication middleware
use crate::{error::ServerError, services::AuthService};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use ballotbox_core::{Identity, UserId};
use std::sync::Arc;

/// Extension type to store the authenticated caller in the request
/// Can be used as an extractor in handlers
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Identity);

impl AuthenticatedUser {
    pub fn user_id(&self) -> UserId {
        self.0.user_id
    }

    pub fn is_admin(&self) -> bool {
        self.0.is_admin
    }

    pub fn identity(&self) -> &Identity {
        &self.0
    }

    /// Reject callers without the admin flag
    pub fn require_admin(&self) -> Result<(), ServerError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ServerError::Forbidden("Admin access required".to_string()))
        }
    }
}

/// Middleware that validates a bearer JWT when one is present
///
/// A valid token attaches an [`AuthenticatedUser`]; a missing or invalid one
/// leaves the request anonymous. Handlers that need a caller take
/// `AuthenticatedUser` as an extractor, which rejects anonymous requests.
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if let Some(token) = token {
        match auth_service.verify_access_token(token) {
            Ok(identity) => {
                request.extensions_mut().insert(AuthenticatedUser(identity));
            }
            Err(e) => tracing::warn!("Token verification failed: {}", e),
        }
    }

    next.run(request).await
}

/// Implement FromRequestParts so AuthenticatedUser can be used as an extractor
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| ServerError::Auth("Not authenticated".to_string()))
    }
}
