use crate::error::AuthError;
use http::HeaderMap;
use http::header::AUTHORIZATION;

/// Extracts the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively and the header must consist of
/// exactly two whitespace-separated parts.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;

    let value = header
        .to_str()
        .map_err(|_| AuthError::invalid_header("Authorization header is not valid text"))?;

    let mut parts = value.split_whitespace();
    let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        (Some(_), None, _) => return Err(AuthError::invalid_header("Token not found")),
        (None, _, _) => return Err(AuthError::MissingToken),
        (Some(_), Some(_), Some(_)) => {
            return Err(AuthError::invalid_header(
                "Authorization header must be bearer token",
            ));
        }
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::invalid_header(
            "Authorization header must start with \"Bearer\"",
        ));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc")), Ok("abc"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(&headers("")), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_wrong_scheme() {
        assert!(matches!(
            bearer_token(&headers("Basic dXNlcjpwYXNz")),
            Err(AuthError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_token_not_found() {
        assert!(matches!(
            bearer_token(&headers("Bearer")),
            Err(AuthError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_too_many_parts() {
        assert!(matches!(
            bearer_token(&headers("Bearer abc def")),
            Err(AuthError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_non_text_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::InvalidHeader(_))
        ));
    }
}
