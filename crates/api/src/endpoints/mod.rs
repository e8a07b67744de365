//! API endpoints.

mod admin;
mod auth;
mod registration;
mod verification;

use axum::Router;

use crate::middleware::AppState;
use crate::sse;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/registration", registration::router())
        .nest("/verification", verification::router())
        .nest("/admin", admin::router())
        .nest("/events", sse::router())
}
