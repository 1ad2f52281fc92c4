use http::StatusCode;
use thiserror::Error;

/// Reasons a request can be refused before it reaches a resource handler.
///
/// Every variant except [`AuthError::Forbidden`] describes a problem with the
/// token itself and maps to `401 Unauthorized`. `Forbidden` is a legitimate
/// denial for a well-formed token and maps to `403 Forbidden`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected")]
    MissingToken,

    #[error("{0}")]
    InvalidHeader(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("{0}")]
    InvalidClaims(String),

    #[error("{0}")]
    InvalidSignature(String),

    #[error("Permission not found: {0}")]
    Forbidden(String),
}

impl AuthError {
    pub fn invalid_header<S: Into<String>>(description: S) -> Self {
        Self::InvalidHeader(description.into())
    }

    pub fn invalid_claims<S: Into<String>>(description: S) -> Self {
        Self::InvalidClaims(description.into())
    }

    pub fn invalid_signature<S: Into<String>>(description: S) -> Self {
        Self::InvalidSignature(description.into())
    }

    /// Machine-readable code reported in the `error` field of responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingToken => "MissingToken",
            Self::InvalidHeader(_) => "InvalidHeader",
            Self::ExpiredToken => "ExpiredToken",
            Self::InvalidClaims(_) => "InvalidClaims",
            Self::InvalidSignature(_) => "InvalidSignature",
            Self::Forbidden(_) => "Forbidden",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}
