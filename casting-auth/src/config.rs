use jsonwebtoken::Algorithm;
use std::time::Duration;

/// Settings the token verifier needs from the identity provider
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Expected `iss` claim, e.g. `https://casting.eu.auth0.com/`
    pub issuer: String,
    /// Expected `aud` claim (the API identifier registered with the provider)
    pub audience: String,
    /// Signing algorithm tokens must use
    pub algorithm: Algorithm,
    /// Explicit JWKS location. When unset the location is discovered from
    /// `{issuer}/.well-known/openid-configuration`.
    pub jwks_url: Option<String>,
    /// How long fetched keys stay cached
    pub jwks_cache_ttl: Duration,
    /// Minimum delay between two key set fetches triggered by unknown key ids
    pub jwks_min_refresh_interval: Duration,
}

impl VerifierConfig {
    pub fn new<S: Into<String>>(issuer: S, audience: S) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            algorithm: Algorithm::RS256,
            jwks_url: None,
            jwks_cache_ttl: Duration::from_secs(600),
            jwks_min_refresh_interval: Duration::from_secs(30),
        }
    }

    pub fn with_jwks_url<S: Into<String>>(mut self, url: S) -> Self {
        self.jwks_url = Some(url.into());
        self
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.jwks_min_refresh_interval = interval;
        self
    }
}
