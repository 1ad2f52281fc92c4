pub(crate) mod actor;
pub(crate) mod movie;

pub(crate) use actor::{Actor, ActorInput, ActorPatch, NewActor};
pub(crate) use movie::{Movie, MovieInput, MoviePatch, NewMovie};
use thiserror::Error;

/// A request body that parsed but holds an unacceptable value
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Trims `value`, rejecting it when nothing is left
fn non_empty(field: &str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError(format!("'{}' must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError(format!("'{}' is required", field)))
}
