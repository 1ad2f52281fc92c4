use crate::bearer::bearer_token;
use crate::claims::TokenPayload;
use crate::config::VerifierConfig;
use crate::error::AuthError;
use crate::jwks::{KeySetError, KeySource, KeyStore};
use crate::permissions::check_permission;
use http::HeaderMap;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Validation, decode, decode_header};
use log::{debug, error};
use reqwest::Client;
use url::Url;

/// Verifies bearer tokens issued by the configured identity provider
pub struct TokenVerifier {
    keys: KeyStore,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &VerifierConfig, client: Client) -> Result<Self, KeySetError> {
        let source = match &config.jwks_url {
            Some(url) => KeySource::Jwks(Url::parse(url)?),
            None => KeySource::Discovery(Url::parse(&config.issuer)?),
        };
        let keys = KeyStore::new(
            client,
            source,
            config.jwks_cache_ttl,
            config.jwks_min_refresh_interval,
        );
        Ok(Self::with_key_store(config, keys))
    }

    pub fn with_key_store(config: &VerifierConfig, keys: KeyStore) -> Self {
        let mut validation = Validation::new(config.algorithm);
        validation.set_audience(&[&config.audience]);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        Self { keys, validation }
    }

    /// Checks structure, signature, expiry, issuer and audience of `token`.
    ///
    /// The key is looked up strictly by the `kid` the token declares.
    pub async fn verify(&self, token: &str) -> Result<TokenPayload, AuthError> {
        let header = decode_header(token).map_err(|e| {
            debug!("Failed to decode token header: {}", e);
            AuthError::invalid_header("Unable to parse authentication token")
        })?;

        let kid = header
            .kid
            .ok_or_else(|| AuthError::invalid_header("Authorization malformed"))?;

        let key = self.keys.get(&kid).await.map_err(|e| match e {
            KeySetError::UnknownKey(_) => {
                AuthError::invalid_header("Unable to find the appropriate key")
            }
            other => {
                error!("Failed to load signing keys: {}", other);
                AuthError::invalid_signature("Unable to load signing keys")
            }
        })?;

        decode::<TokenPayload>(token, &key, &self.validation)
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }

    /// Runs the full guard sequence for a request: extract the bearer token,
    /// verify it, then check that it grants `permission`.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        permission: &str,
    ) -> Result<TokenPayload, AuthError> {
        let token = bearer_token(headers)?;
        let payload = self.verify(token).await?;
        check_permission(&payload, permission)?;
        Ok(payload)
    }
}

fn map_decode_error(e: JwtError) -> AuthError {
    debug!("Token rejected: {}", e);
    match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::Json(_) => AuthError::invalid_claims(
            "Incorrect claims. Please, check the audience and issuer",
        ),
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidRsaKey(_)
        | ErrorKind::InvalidKeyFormat => {
            AuthError::invalid_signature("Token signature could not be verified")
        }
        _ => AuthError::invalid_header("Unable to parse authentication token"),
    }
}
