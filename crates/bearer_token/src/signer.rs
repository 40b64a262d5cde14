use crate::{ClaimSet, Error, Secret, SignedToken, jwt, now_unix_seconds};
use std::{sync::Arc, time::Duration};

/// Issues HS256 access tokens for a fixed issuer, audience and lifetime.
#[derive(Debug, Clone)]
pub struct TokenSigner {
    secret: Arc<Secret>,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenSigner {
    pub(crate) fn new(secret: Arc<Secret>, issuer: String, audience: String, ttl: Duration) -> Self {
        Self {
            secret,
            issuer,
            audience,
            ttl,
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign `claims`, valid from now until now + ttl.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the claims lack a subject or token id.
    pub fn sign(&self, claims: &ClaimSet) -> Result<SignedToken, Error> {
        self.sign_at(claims, now_unix_seconds())
    }

    /// Sign `claims` as if the current time were `now_unix_seconds`.
    ///
    /// # Errors
    ///
    /// See [`TokenSigner::sign`].
    pub fn sign_at(&self, claims: &ClaimSet, now_unix_seconds: i64) -> Result<SignedToken, Error> {
        jwt::sign_hs256(
            claims,
            &self.secret,
            &self.issuer,
            &self.audience,
            self.ttl,
            now_unix_seconds,
        )
    }
}
