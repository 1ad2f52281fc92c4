use super::{DbError, Repository};
use crate::models::{Movie, MoviePatch, NewMovie};
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Movies stored in the `movies` table
#[derive(Debug, Clone)]
pub struct SqliteMovieRepository {
    pool: SqlitePool,
}

impl SqliteMovieRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Movie, NewMovie, MoviePatch> for SqliteMovieRepository {
    async fn list(&self) -> Result<Vec<Movie>, DbError> {
        let movies =
            sqlx::query_as::<_, Movie>("SELECT id, title, release_date FROM movies ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(movies)
    }

    async fn get(&self, id: i64) -> Result<Option<Movie>, DbError> {
        let movie =
            sqlx::query_as::<_, Movie>("SELECT id, title, release_date FROM movies WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(movie)
    }

    async fn insert(&self, movie: NewMovie) -> Result<i64, DbError> {
        let result = sqlx::query("INSERT INTO movies (title, release_date) VALUES (?, ?)")
            .bind(movie.title)
            .bind(movie.release_date)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn update(&self, id: i64, patch: MoviePatch) -> Result<bool, DbError> {
        let result = sqlx::query(
            "UPDATE movies SET \
                title = COALESCE(?, title), \
                release_date = COALESCE(?, release_date) \
             WHERE id = ?",
        )
        .bind(patch.title)
        .bind(patch.release_date)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
