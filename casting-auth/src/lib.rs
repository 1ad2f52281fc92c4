//! # casting-auth
//!
//! Bearer token authorization for the Casting Agency API.
//!
//! ## Components
//!
//! - **Key store:** fetches and caches the identity provider's signing keys.
//! - **Verifier:** checks a token's signature, expiry, issuer and audience.
//! - **Permissions:** decides whether verified claims grant a permission.

pub mod bearer;
pub mod claims;
pub mod config;
pub mod error;
pub mod jwks;
pub mod permissions;
pub mod verifier;

pub use crate::bearer::bearer_token;
pub use crate::claims::{Audience, TokenPayload};
pub use crate::config::VerifierConfig;
pub use crate::error::AuthError;
pub use crate::jwks::{KeySetError, KeySource, KeyStore};
pub use crate::permissions::check_permission;
pub use crate::verifier::TokenVerifier;
