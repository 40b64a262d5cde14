use crate::{ClaimSet, Error, Secret, jwt, now_unix_seconds};
use std::sync::Arc;

/// Validates HS256 access tokens against a fixed issuer and audience.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    secret: Arc<Secret>,
    issuer: String,
    audience: String,
}

impl TokenVerifier {
    pub(crate) fn new(secret: Arc<Secret>, issuer: String, audience: String) -> Self {
        Self {
            secret,
            issuer,
            audience,
        }
    }

    /// Validate a compact token and return its claims.
    ///
    /// # Errors
    ///
    /// One of [`Error::MalformedToken`], [`Error::InvalidSignature`],
    /// [`Error::TokenExpired`] or [`Error::InvalidIssuerOrAudience`].
    pub fn validate(&self, token: &str) -> Result<ClaimSet, Error> {
        self.validate_at(token, now_unix_seconds())
    }

    /// Validate as if the current time were `now_unix_seconds`.
    ///
    /// # Errors
    ///
    /// See [`TokenVerifier::validate`].
    pub fn validate_at(&self, token: &str, now_unix_seconds: i64) -> Result<ClaimSet, Error> {
        jwt::verify_hs256(
            token,
            &self.secret,
            &self.issuer,
            &self.audience,
            now_unix_seconds,
        )
    }
}
