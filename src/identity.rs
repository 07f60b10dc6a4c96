//! # Session Identity
//!
//! The identity provider is an external collaborator: it signs session tokens
//! for authenticated users and owns sign-in, sign-up and OAuth federation.
//! This module verifies those tokens (HS256, shared secret) and exposes the
//! claims as a [`SessionIdentity`], the opaque identity the gating layer keys
//! everything on.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;

/// The authenticated identity for the current session, as attested by the
/// external identity provider. Stable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Opaque provider-issued user id.
    pub id: String,
    pub email: Option<String>,
    /// Username of a linked GitHub account, when the user federated one.
    pub github_username: Option<String>,
    pub avatar_url: Option<String>,
}

impl SessionIdentity {
    /// Lookup hints for the identity resolver, in precedence order.
    pub fn hints(&self) -> ResolveHints<'_> {
        ResolveHints {
            email: self.email.as_deref(),
            github_username: self.github_username.as_deref(),
        }
    }
}

/// Optional lookup keys carried by the session, consulted before the
/// identity link itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveHints<'a> {
    pub email: Option<&'a str>,
    pub github_username: Option<&'a str>,
}

/// Claims carried by a provider session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub exp: i64,
}

impl From<SessionClaims> for SessionIdentity {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            github_username: claims.github_username,
            avatar_url: claims.avatar_url,
        }
    }
}

/// Errors that can occur while verifying a session token.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("session token verification is not configured")]
    MissingSecret,
    #[error("invalid session token: {0}")]
    InvalidToken(String),
}

/// Verify a provider session token and extract the session identity.
///
/// Verification is purely local; the provider itself is never called on the
/// request path.
pub fn verify_session_token(
    config: &AppConfig,
    token: &str,
) -> Result<SessionIdentity, IdentityError> {
    let secret = config
        .session_jwt_secret
        .as_deref()
        .ok_or(IdentityError::MissingSecret)?;

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<SessionClaims>(token, &decoding_key, &validation)
        .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims.into())
}
