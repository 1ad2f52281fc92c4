use confique::Config;

/// Configuration for the SQLite database
#[derive(Debug, Config, Clone)]
pub struct DatabaseConfig {
    /// Connection URL (default: sqlite://casting.db?mode=rwc)
    #[config(env = "CASTING_DATABASE_URL", default = "sqlite://casting.db?mode=rwc")]
    pub url: String,

    /// Maximum number of pooled connections (default: 5)
    #[config(env = "CASTING_DATABASE_MAX_CONNECTIONS", default = 5)]
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// An in-memory database lives inside a single connection
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}
