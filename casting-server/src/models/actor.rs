use super::{non_empty, required, ValidationError};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Actor {
    /// Unique identifier assigned on creation
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub gender: String,
}

/// Request body for creating or updating an actor.
///
/// Every field is optional here; creation requires all of them while an
/// update applies only the ones present.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ActorInput {
    #[serde(default)]
    pub name: Option<String>,
    /// Age in years, as a number or a numeric string
    #[serde(default, deserialize_with = "deserialize_age")]
    #[schema(value_type = Option<i64>)]
    pub age: Option<i64>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// A validated actor ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewActor {
    pub name: String,
    pub age: i64,
    pub gender: String,
}

/// Validated fields of an actor update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorPatch {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
}

impl ActorInput {
    pub fn into_new(self) -> Result<NewActor, ValidationError> {
        Ok(NewActor {
            name: non_empty("name", required("name", self.name)?)?,
            age: positive_age(required("age", self.age)?)?,
            gender: non_empty("gender", required("gender", self.gender)?)?,
        })
    }

    pub fn into_patch(self) -> Result<ActorPatch, ValidationError> {
        Ok(ActorPatch {
            name: self.name.map(|name| non_empty("name", name)).transpose()?,
            age: self.age.map(positive_age).transpose()?,
            gender: self
                .gender
                .map(|gender| non_empty("gender", gender))
                .transpose()?,
        })
    }
}

fn positive_age(age: i64) -> Result<i64, ValidationError> {
    if age <= 0 {
        return Err(ValidationError("'age' must be a positive integer".to_string()));
    }
    Ok(age)
}

/// Accepts `60` as well as `"60"`
fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Age {
        Number(i64),
        Text(String),
    }

    match Option::<Age>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Age::Number(age)) => Ok(Some(age)),
        Some(Age::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid age '{}'", text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: serde_json::Value) -> ActorInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_age_as_number_or_string() {
        assert_eq!(input(json!({"age": 60})).age, Some(60));
        assert_eq!(input(json!({"age": "60"})).age, Some(60));
        assert_eq!(input(json!({"age": null})).age, None);
        assert_eq!(input(json!({})).age, None);
    }

    #[test]
    fn test_non_numeric_age_is_rejected() {
        let result = serde_json::from_value::<ActorInput>(json!({"age": "sixty"}));
        assert!(result.is_err());
        let result = serde_json::from_value::<ActorInput>(json!({"age": ""}));
        assert!(result.is_err());
    }

    #[test]
    fn test_into_new() {
        let actor = input(json!({"name": " Michael Bay ", "age": "60", "gender": "M"}))
            .into_new()
            .unwrap();
        assert_eq!(
            actor,
            NewActor {
                name: "Michael Bay".to_string(),
                age: 60,
                gender: "M".to_string(),
            }
        );
    }

    #[test]
    fn test_into_new_requires_every_field() {
        let err = input(json!({"name": "Jean Reno", "age": 70}))
            .into_new()
            .unwrap_err();
        assert_eq!(err, ValidationError("'gender' is required".to_string()));

        assert!(input(json!({"name": "", "age": 70, "gender": "M"}))
            .into_new()
            .is_err());
        assert!(input(json!({"name": "Jean Reno", "age": 0, "gender": "M"}))
            .into_new()
            .is_err());
    }

    #[test]
    fn test_into_patch_keeps_absent_fields_empty() {
        let patch = input(json!({"age": 61})).into_patch().unwrap();
        assert_eq!(
            patch,
            ActorPatch {
                name: None,
                age: Some(61),
                gender: None,
            }
        );
    }

    #[test]
    fn test_into_patch_validates_present_fields() {
        assert!(input(json!({"name": "   "})).into_patch().is_err());
        assert!(input(json!({"age": -3})).into_patch().is_err());
    }
}
