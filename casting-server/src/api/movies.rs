use crate::api::extract::{ApiJson, ApiPath};
use crate::api::guard::{require_permission, requires_auth};
use crate::db::Repository;
use crate::errors::{ApiError, ErrorBody};
use crate::models::{Movie, MovieInput};
use crate::openapi::MOVIES_TAG;
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

pub(crate) const GET_MOVIES: &str = "get:movies";
pub(crate) const POST_MOVIES: &str = "post:movies";
pub(crate) const PATCH_MOVIES: &str = "patch:movies";
pub(crate) const DELETE_MOVIES: &str = "delete:movies";

/// Every stored movie
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MovieList {
    pub success: bool,
    pub movies: Vec<Movie>,
    pub total_movies: usize,
}

/// Id of the created or updated movie
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MovieId {
    pub success: bool,
    pub movie: i64,
}

/// Id of the deleted movie
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MovieDeleted {
    pub success: bool,
    pub deleted: i64,
}

fn movie_not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Movie {} could not be found", id))
}

/// List all movies
#[utoipa::path(
    get,
    path = "/movies",
    tag = MOVIES_TAG,
    security(("bearer_auth" = ["get:movies"])),
    responses(
        (status = 200, description = "All movies ordered by id", body = MovieList),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Token lacks get:movies", body = ErrorBody),
        (status = 404, description = "No movie is stored", body = ErrorBody),
    )
)]
pub(crate) async fn list_movies(
    Extension(_payload): Extension<TokenPayload>,
    State(state): State<AppState>,
) -> Result<Json<MovieList>, ApiError> {
    let movies = state.movies.list().await?;
    if movies.is_empty() {
        return Err(ApiError::not_found("No movies found"));
    }

    Ok(Json(MovieList {
        success: true,
        total_movies: movies.len(),
        movies,
    }))
}

/// Create a movie
#[utoipa::path(
    post,
    path = "/movies",
    tag = MOVIES_TAG,
    security(("bearer_auth" = ["post:movies"])),
    request_body = MovieInput,
    responses(
        (status = 200, description = "Movie created", body = MovieId),
        (status = 400, description = "Body is not JSON", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Token lacks post:movies", body = ErrorBody),
        (status = 422, description = "Missing or invalid field", body = ErrorBody),
    )
)]
pub(crate) async fn create_movie(
    Extension(payload): Extension<TokenPayload>,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<MovieInput>,
) -> Result<Json<MovieId>, ApiError> {
    let movie = input.into_new()?;
    let id = state.movies.insert(movie).await?;
    info!("Movie {} created by {}", id, payload.sub);

    Ok(Json(MovieId {
        success: true,
        movie: id,
    }))
}

/// Update some fields of a movie
#[utoipa::path(
    patch,
    path = "/movies/{id}",
    tag = MOVIES_TAG,
    security(("bearer_auth" = ["patch:movies"])),
    params(("id" = i64, Path, description = "Movie id")),
    request_body = MovieInput,
    responses(
        (status = 200, description = "Movie updated", body = MovieId),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Token lacks patch:movies", body = ErrorBody),
        (status = 404, description = "Movie not found", body = ErrorBody),
        (status = 422, description = "Invalid field", body = ErrorBody),
    )
)]
pub(crate) async fn update_movie(
    Extension(payload): Extension<TokenPayload>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    body: Result<ApiJson<MovieInput>, ApiError>,
) -> Result<Json<MovieId>, ApiError> {
    if state.movies.get(id).await?.is_none() {
        return Err(movie_not_found(id));
    }

    let ApiJson(input) = body?;
    let patch = input.into_patch()?;
    if !state.movies.update(id, patch).await? {
        return Err(movie_not_found(id));
    }
    info!("Movie {} updated by {}", id, payload.sub);

    Ok(Json(MovieId {
        success: true,
        movie: id,
    }))
}

/// Delete a movie
#[utoipa::path(
    delete,
    path = "/movies/{id}",
    tag = MOVIES_TAG,
    security(("bearer_auth" = ["delete:movies"])),
    params(("id" = i64, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Movie deleted", body = MovieDeleted),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Token lacks delete:movies", body = ErrorBody),
        (status = 404, description = "Movie not found", body = ErrorBody),
    )
)]
pub(crate) async fn delete_movie(
    Extension(payload): Extension<TokenPayload>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MovieDeleted>, ApiError> {
    if state.movies.get(id).await?.is_none() {
        return Err(movie_not_found(id));
    }

    if !state.movies.delete(id).await? {
        return Err(movie_not_found(id));
    }
    info!("Movie {} deleted by {}", id, payload.sub);

    Ok(Json(MovieDeleted {
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
            "/movies",
            get(list_movies.layer(guard(GET_MOVIES)))
                .post(create_movie.layer(guard(POST_MOVIES))),
        )
        .route(
            "/movies/{id}",
            patch(update_movie.layer(guard(PATCH_MOVIES)))
                .delete(delete_movie.layer(guard(DELETE_MOVIES))),
        )
}
