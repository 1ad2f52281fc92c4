use super::{non_empty, required, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Movie {
    /// Unique identifier assigned on creation
    pub id: i64,
    pub title: String,
    /// Release date, `YYYY-MM-DD`
    pub release_date: NaiveDate,
}

/// Request body for creating or updating a movie
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MovieInput {
    #[serde(default)]
    pub title: Option<String>,
    /// Also accepted as `release_year`
    #[serde(default, alias = "release_year")]
    pub release_date: Option<NaiveDate>,
}

/// A validated movie ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub release_date: NaiveDate,
}

/// Validated fields of a movie update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl MovieInput {
    pub fn into_new(self) -> Result<NewMovie, ValidationError> {
        Ok(NewMovie {
            title: non_empty("title", required("title", self.title)?)?,
            release_date: required("release_date", self.release_date)?,
        })
    }

    pub fn into_patch(self) -> Result<MoviePatch, ValidationError> {
        Ok(MoviePatch {
            title: self.title.map(|title| non_empty("title", title)).transpose()?,
            release_date: self.release_date,
        })
    }
}
