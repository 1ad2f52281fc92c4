use crate::api::extract::{ApiJson, ApiPath};
use crate::api::guard::{require_permission, requires_auth};
use crate::db::Repository;
use crate::errors::{ApiError, ErrorBody};
use crate::models::{Actor, ActorInput};
use crate::openapi::ACTORS_TAG;
use crate::state::AppState;
use axum::extract::State;
use axum::handler::Handler;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch};
use axum::{Extension, Json, Router};
use casting_auth::TokenPayload;
use log::info;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub(crate) const GET_ACTORS: &str = "get:actors";
pub(crate) const POST_ACTORS: &str = "post:actors";
pub(crate) const PATCH_ACTORS: &str = "patch:actors";
pub(crate) const DELETE_ACTORS: &str = "delete:actors";

/// Every stored actor
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActorList {
    pub success: bool,
    pub actors: Vec<Actor>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActorCreated {
    pub success: bool,
    pub created_actor_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActorUpdated {
    pub success: bool,
    pub actor: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActorDeleted {
    pub success: bool,
    pub deleted: i64,
}

fn actor_not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Actor {} could not be found", id))
}

/// List all actors
#[utoipa::path(
    get,
    path = "/actors",
    tag = ACTORS_TAG,
    security(("bearer_auth" = ["get:actors"])),
    responses(
        (status = 200, description = "All actors ordered by id", body = ActorList),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Token lacks get:actors", body = ErrorBody),
        (status = 404, description = "No actor is stored", body = ErrorBody),
    )
)]
pub(crate) async fn list_actors(
    Extension(_payload): Extension<TokenPayload>,
    State(state): State<AppState>,
) -> Result<Json<ActorList>, ApiError> {
    let actors = state.actors.list().await?;
    if actors.is_empty() {
        return Err(ApiError::not_found("No actors found"));
    }

    Ok(Json(ActorList {
        success: true,
        actors,
    }))
}

/// Create an actor
#[utoipa::path(
    post,
    path = "/actors",
    tag = ACTORS_TAG,
    security(("bearer_auth" = ["post:actors"])),
    request_body = ActorInput,
    responses(
        (status = 200, description = "Actor created", body = ActorCreated),
        (status = 400, description = "Body is not JSON", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Token lacks post:actors", body = ErrorBody),
        (status = 422, description = "Missing or invalid field", body = ErrorBody),
    )
)]
pub(crate) async fn create_actor(
    Extension(payload): Extension<TokenPayload>,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ActorInput>,
) -> Result<Json<ActorCreated>, ApiError> {
    let actor = input.into_new()?;
    let id = state.actors.insert(actor).await?;
    info!("Actor {} created by {}", id, payload.sub);

    Ok(Json(ActorCreated {
        success: true,
        created_actor_id: id,
    }))
}

/// Update some fields of an actor
#[utoipa::path(
    patch,
    path = "/actors/{id}",
    tag = ACTORS_TAG,
    security(("bearer_auth" = ["patch:actors"])),
    params(("id" = i64, Path, description = "Actor id")),
    request_body = ActorInput,
    responses(
        (status = 200, description = "Actor updated", body = ActorUpdated),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Token lacks patch:actors", body = ErrorBody),
        (status = 404, description = "Actor not found", body = ErrorBody),
        (status = 422, description = "Invalid field", body = ErrorBody),
    )
)]
pub(crate) async fn update_actor(
    Extension(payload): Extension<TokenPayload>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    body: Result<ApiJson<ActorInput>, ApiError>,
) -> Result<Json<ActorUpdated>, ApiError> {
    if state.actors.get(id).await?.is_none() {
        return Err(actor_not_found(id));
    }

    let ApiJson(input) = body?;
    let patch = input.into_patch()?;
    if !state.actors.update(id, patch).await? {
        return Err(actor_not_found(id));
    }
    info!("Actor {} updated by {}", id, payload.sub);

    Ok(Json(ActorUpdated {
        success: true,
        actor: id,
    }))
}

/// Delete an actor
#[utoipa::path(
    delete,
    path = "/actors/{id}",
    tag = ACTORS_TAG,
    security(("bearer_auth" = ["delete:actors"])),
    params(("id" = i64, Path, description = "Actor id")),
    responses(
        (status = 200, description = "Actor deleted", body = ActorDeleted),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Token lacks delete:actors", body = ErrorBody),
        (status = 404, description = "Actor not found", body = ErrorBody),
    )
)]
pub(crate) async fn delete_actor(
    Extension(payload): Extension<TokenPayload>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ActorDeleted>, ApiError> {
    if state.actors.get(id).await?.is_none() {
        return Err(actor_not_found(id));
    }

    if !state.actors.delete(id).await? {
        return Err(actor_not_found(id));
    }
    info!("Actor {} deleted by {}", id, payload.sub);

    Ok(Json(ActorDeleted {
        success: true,
        deleted: id,
    }))
}

pub(super) fn router(state: &AppState) -> Router<AppState> {
    let guard = |permission: &'static str| {
        from_fn_with_state(requires_auth(state, permission), require_permission)
    };

    Router::new()
        .route(
            "/actors",
            get(list_actors.layer(guard(GET_ACTORS)))
                .post(create_actor.layer(guard(POST_ACTORS))),
        )
        .route(
            "/actors/{id}",
            patch(update_actor.layer(guard(PATCH_ACTORS)))
                .delete(delete_actor.layer(guard(DELETE_ACTORS))),
        )
}
