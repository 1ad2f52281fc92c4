//! Trusted signing keys published by the identity provider.

use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::{Jwk, PublicKeyUse};
use log::{debug, info, warn};
use moka::future::Cache as MokaCache;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{Mutex, OnceCell};
use url::Url;

/// Errors that can occur while loading the trusted key set
#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Discovery document at {0} does not advertise a jwks_uri")]
    MissingJwksUri(Url),
    #[error("No signing key with id '{0}'")]
    UnknownKey(String),
}

/// Where the key set is fetched from
#[derive(Debug, Clone)]
pub enum KeySource {
    /// A JWKS document at a fixed location
    Jwks(Url),
    /// Resolve the JWKS location through the issuer's OpenID discovery document
    Discovery(Url),
}

#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    jwks_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawKeySet {
    keys: Vec<Value>,
}

/// Cache of verification keys indexed by key id (`kid`).
///
/// Lookups are served from an in-memory cache. A miss triggers a refetch of
/// the whole set, at most once per `min_refresh_interval`, so a flood of
/// tokens with made-up key ids cannot hammer the provider.
pub struct KeyStore {
    client: Client,
    source: KeySource,
    discovered_jwks_url: OnceCell<Url>,
    keys: MokaCache<String, DecodingKey>,
    min_refresh_interval: Duration,
    last_refresh: Mutex<Option<Instant>>,
}

impl KeyStore {
    pub fn new(
        client: Client,
        source: KeySource,
        ttl: Duration,
        min_refresh_interval: Duration,
    ) -> Self {
        let keys = MokaCache::builder()
            .time_to_live(ttl)
            .max_capacity(256)
            .build();

        Self {
            client,
            source,
            discovered_jwks_url: OnceCell::new(),
            keys,
            min_refresh_interval,
            last_refresh: Mutex::new(None),
        }
    }

    /// Returns the verification key for `kid`, refreshing the set on a miss
    pub async fn get(&self, kid: &str) -> Result<DecodingKey, KeySetError> {
        if let Some(key) = self.keys.get(kid).await {
            return Ok(key);
        }

        self.refresh().await?;

        self.keys
            .get(kid)
            .await
            .ok_or_else(|| KeySetError::UnknownKey(kid.to_string()))
    }

    /// Refetches the key set unless it was fetched within `min_refresh_interval`
    pub async fn refresh(&self) -> Result<(), KeySetError> {
        let mut last_refresh = self.last_refresh.lock().await;
        if let Some(at) = *last_refresh {
            if at.elapsed() < self.min_refresh_interval {
                debug!("Key set refreshed {:?} ago, skipping refetch", at.elapsed());
                return Ok(());
            }
        }

        // Failed attempts count towards the interval too
        *last_refresh = Some(Instant::now());
        let keys = self.fetch().await?;
        self.keys.invalidate_all();
        let count = keys.len();
        for (kid, key) in keys {
            self.keys.insert(kid, key).await;
        }

        info!("Loaded {} signing key(s)", count);
        Ok(())
    }

    async fn fetch(&self) -> Result<Vec<(String, DecodingKey)>, KeySetError> {
        let url = self.jwks_url().await?;
        debug!("Fetching key set from {}", url);

        let raw: RawKeySet = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(raw.keys.into_iter().filter_map(signing_key).collect())
    }

    async fn jwks_url(&self) -> Result<&Url, KeySetError> {
        match &self.source {
            KeySource::Jwks(url) => Ok(url),
            KeySource::Discovery(issuer) => {
                self.discovered_jwks_url
                    .get_or_try_init(|| discover_jwks_url(&self.client, issuer))
                    .await
            }
        }
    }
}

/// Resolves `jwks_uri` from `{issuer}/.well-known/openid-configuration`
async fn discover_jwks_url(client: &Client, issuer: &Url) -> Result<Url, KeySetError> {
    let mut base = issuer.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    let discovery_url = base.join(".well-known/openid-configuration")?;
    info!("Discovering key set location from {}", discovery_url);

    let document: DiscoveryDocument = client
        .get(discovery_url.clone())
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let jwks_uri = document
        .jwks_uri
        .ok_or(KeySetError::MissingJwksUri(discovery_url))?;
    Ok(Url::parse(&jwks_uri)?)
}

/// Converts one JWKS entry into a `(kid, key)` pair if it can verify signatures
fn signing_key(raw: Value) -> Option<(String, DecodingKey)> {
    let jwk: Jwk = match serde_json::from_value(raw) {
        Ok(jwk) => jwk,
        Err(e) => {
            warn!("Skipping unsupported key in key set: {}", e);
            return None;
        }
    };

    if !matches!(
        jwk.common.public_key_use,
        None | Some(PublicKeyUse::Signature)
    ) {
        return None;
    }

    let Some(kid) = jwk.common.key_id.clone() else {
        warn!("Skipping key without a key id");
        return None;
    };

    match DecodingKey::from_jwk(&jwk) {
        Ok(key) => Some((kid, key)),
        Err(e) => {
            warn!("Skipping key '{}': {}", kid, e);
            None
        }
    }
}
