//! Per-route authorization.
//!
//! Each protected handler is layered with [`require_permission`], whose state
//! names the single permission the handler needs. The middleware runs the
//! full token check and hands the verified [`TokenPayload`] to the handler
//! through the request extensions, so handlers take `Extension<TokenPayload>`
//! as first argument.

use crate::errors::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use casting_auth::{TokenPayload, TokenVerifier};
use log::{debug, warn};
use std::sync::Arc;

/// Middleware state: the verifier and the permission a route requires
#[derive(Clone)]
pub(crate) struct RequiredPermission {
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
}

pub(crate) fn requires_auth(state: &AppState, permission: &'static str) -> RequiredPermission {
    RequiredPermission {
        verifier: state.verifier.clone(),
        permission,
    }
}

pub(crate) async fn require_permission(
    State(required): State<RequiredPermission>,
    mut request: Request,
    next: Next,
) -> Response {
    let result = required
        .verifier
        .authorize(request.headers(), required.permission)
        .await;

    match result {
        Ok(payload) => {
            debug!("Granted '{}' to {}", required.permission, payload.sub);
            request.extensions_mut().insert::<TokenPayload>(payload);
            next.run(request).await
        }
        Err(err) => {
            warn!(
                "Rejected {} {}: {}",
                request.method(),
                request.uri().path(),
                err
            );
            ApiError::from(err).into_response()
        }
    }
}
