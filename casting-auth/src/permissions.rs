use crate::claims::TokenPayload;
use crate::error::AuthError;

/// Checks that `payload` grants `required`.
///
/// Matching is exact and case-sensitive. A token that carries no
/// `permissions` claim at all was issued without RBAC enabled, which is
/// reported as `InvalidClaims` rather than `Forbidden`.
pub fn check_permission(payload: &TokenPayload, required: &str) -> Result<(), AuthError> {
    let granted = payload
        .permissions
        .as_ref()
        .ok_or_else(|| AuthError::invalid_claims("Permissions not included in JWT"))?;

    if granted.iter().any(|permission| permission == required) {
        Ok(())
    } else {
        Err(AuthError::Forbidden(required.to_string()))
    }
}
