//! Route definitions for the sharing-core HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(share_routes())
        .merge(permission_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Invitation and link endpoints.
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/share/invite", post(handlers::share::create_invite))
        .route(
            "/share/accept/{token}",
            post(handlers::share::accept_invite),
        )
        .route(
            "/share/decline/{token}",
            post(handlers::share::decline_invite),
        )
        .route(
            "/share/sent-invites",
            get(handlers::share::list_sent_invites),
        )
        .route(
            "/share/invites",
            get(handlers::share::list_received_invites),
        )
        .route("/share/link", post(handlers::share::create_link))
        .route("/share/redeem/{token}", post(handlers::share::redeem_link))
        .route("/share/links", get(handlers::share::list_my_links))
        .route(
            "/share/links/{resource_type}/{resource_id}",
            get(handlers::share::list_links),
        )
        .route("/share/link/{id}", delete(handlers::share::revoke_link))
}

/// Grant management endpoints.
fn permission_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/permissions/{grant_id}",
            delete(handlers::permission::revoke_access),
        )
        .route(
            "/resources/{resource_type}/{resource_id}/collaborators",
            get(handlers::permission::list_collaborators),
        )
}

/// Health endpoints.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Build a CORS layer from the configured origins. An empty list allows
/// any origin.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.config.server.cors_origins;
    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
