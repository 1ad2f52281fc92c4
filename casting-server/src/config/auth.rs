use casting_auth::VerifierConfig;
use confique::Config;
use jsonwebtoken::Algorithm;
use std::str::FromStr;
use std::time::Duration;

/// Configuration for the identity provider that issues bearer tokens
#[derive(Debug, Config, Clone)]
pub struct AuthConfig {
    /// Expected token issuer, e.g. https://casting.eu.auth0.com/
    #[config(env = "CASTING_AUTH_ISSUER")]
    pub issuer: String,

    /// Expected token audience (the API identifier)
    #[config(env = "CASTING_AUTH_AUDIENCE")]
    pub audience: String,

    /// JWKS location; discovered from the issuer when unset
    #[config(env = "CASTING_AUTH_JWKS_URL")]
    pub jwks_url: Option<String>,

    /// Signing algorithm tokens must use (default: RS256)
    #[config(env = "CASTING_AUTH_ALGORITHM", default = "RS256")]
    pub algorithm: String,

    /// How long fetched signing keys are cached, in seconds (default: 600)
    #[config(env = "CASTING_AUTH_JWKS_CACHE_TTL", default = 600)]
    pub jwks_cache_ttl: u64,

    /// Minimum delay between key set refetches, in seconds (default: 30)
    #[config(env = "CASTING_AUTH_JWKS_MIN_REFRESH_INTERVAL", default = 30)]
    pub jwks_min_refresh_interval: u64,

    /// Timeout for requests to the identity provider, in seconds (default: 5)
    #[config(env = "CASTING_AUTH_HTTP_TIMEOUT", default = 5)]
    pub http_timeout: u64,
}

impl AuthConfig {
    /// Builds the settings handed to the token verifier
    pub fn verifier_config(&self) -> Result<VerifierConfig, String> {
        let algorithm = Algorithm::from_str(&self.algorithm)
            .map_err(|_| format!("Unsupported signing algorithm '{}'", self.algorithm))?;

        let mut config = VerifierConfig::new(self.issuer.clone(), self.audience.clone())
            .with_min_refresh_interval(Duration::from_secs(self.jwks_min_refresh_interval));
        config.algorithm = algorithm;
        config.jwks_cache_ttl = Duration::from_secs(self.jwks_cache_ttl);
        if let Some(url) = &self.jwks_url {
            config = config.with_jwks_url(url.clone());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_config(algorithm: &str) -> AuthConfig {
        AuthConfig {
            issuer: "https://casting.eu.auth0.com/".to_string(),
            audience: "casting".to_string(),
            jwks_url: None,
            algorithm: algorithm.to_string(),
            jwks_cache_ttl: 120,
            jwks_min_refresh_interval: 10,
            http_timeout: 5,
        }
    }

    #[test]
    fn test_verifier_config() {
        let config = auth_config("RS256").verifier_config().unwrap();

        assert_eq!(config.issuer, "https://casting.eu.auth0.com/");
        assert_eq!(config.audience, "casting");
        assert_eq!(config.algorithm, Algorithm::RS256);
        assert_eq!(config.jwks_url, None);
        assert_eq!(config.jwks_cache_ttl, Duration::from_secs(120));
        assert_eq!(config.jwks_min_refresh_interval, Duration::from_secs(10));
    }

    #[test]
    fn test_unknown_algorithm() {
        assert!(auth_config("XS999").verifier_config().is_err());
    }
}
