use crate::config::AppConfig;
use crate::db::{ActorRepository, Database, DbError, MovieRepository};
use casting_auth::{KeySetError, TokenVerifier};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while building the application state
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Invalid auth configuration: {0}")]
    Config(String),
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Failed to set up key store: {0}")]
    KeySet(#[from] KeySetError),
    #[error(transparent)]
    Database(#[from] DbError),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub verifier: Arc<TokenVerifier>,
    pub db: Database,
    pub actors: Arc<ActorRepository>,
    pub movies: Arc<MovieRepository>,
}

impl AppState {
    fn create_idp_client(timeout: u64) -> Result<Client, reqwest::Error> {
        Client::builder()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(2))
            .pool_max_idle_per_host(2)
            .build()
    }

    pub async fn new(config: AppConfig) -> Result<Self, StateError> {
        let db = Database::connect(&config.database).await?;
        Self::with_database(config, db)
    }

    /// Builds the state on top of an already opened database
    pub fn with_database(config: AppConfig, db: Database) -> Result<Self, StateError> {
        let verifier_config = config.auth.verifier_config().map_err(StateError::Config)?;
        let client = Self::create_idp_client(config.auth.http_timeout)?;
        let verifier = TokenVerifier::new(&verifier_config, client)?;

        Ok(Self {
            config: Arc::new(config),
            verifier: Arc::new(verifier),
            actors: Arc::new(db.actors()),
            movies: Arc::new(db.movies()),
            db,
        })
    }

    /// Returns whether the service can serve requests
    pub async fn health_check(&self) -> bool {
        match self.db.ping().await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Readiness check failed: {}", e);
                false
            }
        }
    }

    #[cfg(test)]
    pub async fn for_testing(config: &AppConfig) -> Self {
        let db = Database::in_memory().await;
        Self::with_database(config.clone(), db).expect("Failed to create test state")
    }
}
