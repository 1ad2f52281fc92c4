pub(crate) use crate::config::auth::AuthConfig;
pub(crate) use crate::config::database::DatabaseConfig;
use confique::Config;

pub mod auth;
pub mod database;

/// Environment variable naming an optional TOML file with the same keys
pub const CONFIG_FILE_ENV: &str = "CASTING_CONFIG_FILE";

/// Main configuration structure for the casting server
#[derive(Debug, Config, Clone)]
pub struct AppConfig {
    /// The port the server will listen to (default: 8080)
    #[config(env = "CASTING_PORT", default = 8080)]
    pub port: u16,

    /// Database configuration
    #[config(nested)]
    pub database: DatabaseConfig,

    /// Identity provider configuration
    #[config(nested)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Loads the configuration from environment variables, falling back to the
    /// file named by `CASTING_CONFIG_FILE` when it is set.
    pub fn load() -> Result<Self, confique::Error> {
        let mut builder = Self::builder().env();
        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            builder = builder.file(path);
        }
        builder.load()
    }

    #[cfg(test)]
    pub fn for_test_with_mock(idp_mock: &wiremock::MockServer) -> Self {
        Self {
            port: 0,
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            auth: AuthConfig {
                issuer: format!("{}/", idp_mock.uri()),
                audience: "casting".to_string(),
                jwks_url: Some(format!("{}/.well-known/jwks.json", idp_mock.uri())),
                algorithm: "RS256".to_string(),
                jwks_cache_ttl: 600,
                jwks_min_refresh_interval: 0,
                http_timeout: 5,
            },
        }
    }
}
