pub(crate) mod actors;
pub(crate) mod movies;

use crate::config::DatabaseConfig;
use crate::models::{Actor, ActorPatch, Movie, MoviePatch, NewActor, NewMovie};
use async_trait::async_trait;
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use thiserror::Error;

pub(crate) use actors::SqliteActorRepository;
pub(crate) use movies::SqliteMovieRepository;

const CREATE_MOVIES: &str = "\
CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    release_date TEXT NOT NULL
)";

const CREATE_ACTORS: &str = "\
CREATE TABLE IF NOT EXISTS actors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    age INTEGER NOT NULL CHECK (age > 0),
    gender TEXT NOT NULL
)";

/// Errors raised by the persistence layer
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Storage of one kind of record.
///
/// `New` is a validated record without id, `Patch` a set of optional field
/// updates. `update` and `delete` report whether a row with `id` existed.
#[async_trait]
pub trait Repository<T, New, Patch>: Send + Sync {
    /// All records ordered by id
    async fn list(&self) -> Result<Vec<T>, DbError>;
    async fn get(&self, id: i64) -> Result<Option<T>, DbError>;
    /// Inserts the record and returns its new id
    async fn insert(&self, record: New) -> Result<i64, DbError>;
    async fn update(&self, id: i64, patch: Patch) -> Result<bool, DbError>;
    async fn delete(&self, id: i64) -> Result<bool, DbError>;
}

pub type ActorRepository = dyn Repository<Actor, NewActor, ActorPatch>;
pub type MovieRepository = dyn Repository<Movie, NewMovie, MoviePatch>;

/// Connection pool to the casting database
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and makes sure the schema exists
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        let pool = if config.is_in_memory() {
            // Every connection to :memory: opens its own empty database, so keep exactly one alive
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options)
                .await?
        };

        let db = Self { pool };
        db.init_schema().await?;
        info!("Connected to database {}", config.url);
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), DbError> {
        for statement in [CREATE_MOVIES, CREATE_ACTORS] {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("Database schema is up to date");
        Ok(())
    }

    /// Round-trips a trivial query
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn actors(&self) -> SqliteActorRepository {
        SqliteActorRepository::new(self.pool.clone())
    }

    pub fn movies(&self) -> SqliteMovieRepository {
        SqliteMovieRepository::new(self.pool.clone())
    }

    #[cfg(test)]
    pub async fn in_memory() -> Self {
        Self::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .expect("Failed to open in-memory database")
    }
}
