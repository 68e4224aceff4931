/// HTTP router
use crate::{api, middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router with every `/api` route
///
/// All routes pass through [`middleware::auth_middleware`]; handlers that
/// require a caller reject anonymous requests through the
/// [`middleware::AuthenticatedUser`] extractor, and admin handlers check the
/// admin flag themselves.
pub fn create_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        // Accounts
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/refresh", post(api::auth::refresh))
        // Polls
        .route(
            "/polls",
            get(api::polls::list_polls).post(api::polls::create_poll),
        )
        .route("/polls/:id", get(api::polls::get_poll))
        .route("/polls/:id/results", get(api::polls::get_results))
        .route("/polls/:id/vote", post(api::polls::vote))
        // Admin
        .route("/admin/polls", get(api::admin::list_polls))
        .route("/admin/polls/:id/close", post(api::admin::close_poll))
        .route(
            "/admin/polls/:id",
            axum::routing::delete(api::admin::delete_poll),
        )
        .route("/admin/users", get(api::admin::list_users))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.auth_service),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
