use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Welcome {
    pub success: bool,
    pub message: String,
}

/// Welcome document
#[utoipa::path(
    get,
    path = "/",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "The API is up", body = Welcome)
    )
)]
async fn index() -> Json<Welcome> {
    Json(Welcome {
        success: true,
        message: "Welcome to the Casting Agency API".to_string(),
    })
}

pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(index))
}
