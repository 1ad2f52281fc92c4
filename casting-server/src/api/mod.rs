pub(crate) mod actors;
mod extract;
mod guard;
pub(crate) mod health;
mod index;
pub(crate) mod movies;

use crate::errors::ApiError;
use crate::state::AppState;
use axum::Router;
use utoipa_axum::router::OpenApiRouter;

/// Routes that need no token, documented through their own OpenAPI router
pub(super) fn public_router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(index::router())
        .merge(health::router())
}

/// Routes guarded by a per-handler permission check
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(movies::router(state))
        .merge(actors::router(state))
}

/// Answers requests that match no route
pub(super) async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

/// Answers requests to a known route with an unsupported method
pub(super) async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed("Method not allowed")
}
