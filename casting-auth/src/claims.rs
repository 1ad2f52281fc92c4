use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `aud` claim, which identity providers emit either as a single string
/// or as a list of audiences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::Single(aud) => aud == audience,
            Self::Many(auds) => auds.iter().any(|aud| aud == audience),
        }
    }
}

/// Claims of a verified access token.
///
/// Lives for a single request: the guard layer attaches it to the request
/// extensions and the handler receives it as its first argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub iss: String,
    pub sub: String,
    pub aud: Audience,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Granted permission strings, e.g. `get:movies`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    /// Provider specific claims (`azp`, `scope`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
