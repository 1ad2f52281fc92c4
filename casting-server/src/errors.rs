use crate::db::DbError;
use crate::models::ValidationError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::response::IntoResponse;
use axum::Json;
use casting_auth::AuthError;
use http::StatusCode;
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`
    pub success: bool,
    /// Machine readable error code, e.g. `NotFound` or `ExpiredToken`
    pub error: String,
    /// Human readable description
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
    pub status_code: StatusCode,
}

impl ApiError {
    /// Create a new ApiError with a code, message and status code
    pub fn new<S: ToString>(code: &'static str, message: S, status_code: StatusCode) -> Self {
        Self {
            code,
            message: message.to_string(),
            status_code,
        }
    }

    /// Create new Bad Request Error (400) with a message
    pub fn bad_request<S: ToString>(message: S) -> Self {
        Self::new("BadRequest", message, StatusCode::BAD_REQUEST)
    }

    /// Create new Not Found Error (404) with a message
    pub fn not_found<S: ToString>(message: S) -> Self {
        Self::new("NotFound", message, StatusCode::NOT_FOUND)
    }

    /// Create new Method Not Allowed Error (405) with a message
    pub fn method_not_allowed<S: ToString>(message: S) -> Self {
        Self::new("MethodNotAllowed", message, StatusCode::METHOD_NOT_ALLOWED)
    }

    /// Create new Unprocessable Entity Error (422) with a message
    pub fn unprocessable<S: ToString>(message: S) -> Self {
        Self::new("Unprocessable", message, StatusCode::UNPROCESSABLE_ENTITY)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::new(err.code(), &err, err.status_code())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::unprocessable(err)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        error!("{}", err);
        Self::unprocessable("The request could not be processed")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => Self::unprocessable(e.body_text()),
            other => Self::bad_request(other.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::not_found(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorBody {
            success: false,
            error: self.code.to_string(),
            message: self.message,
        };
        (self.status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_auth_error_is_rendered_unchanged() {
        let (status, body) = render(AuthError::ExpiredToken.into()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "ExpiredToken");
        assert_eq!(body["message"], AuthError::ExpiredToken.to_string());
    }

    #[tokio::test]
    async fn test_forbidden() {
        let err = AuthError::Forbidden("delete:actors".to_string());
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Forbidden");
    }

    #[tokio::test]
    async fn test_validation_error_is_unprocessable() {
        let err = ValidationError("'title' must not be empty".to_string());
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Unprocessable");
        assert_eq!(body["message"], "'title' must not be empty");
    }

    #[tokio::test]
    async fn test_database_error_is_unprocessable() {
        let err = DbError::Sqlx(sqlx::Error::RowNotFound);
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Unprocessable");
    }
}
