use crate::{Error, Secret, TokenSigner, TokenVerifier};
use std::{sync::Arc, time::Duration};

pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Process-wide token settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    secret: Arc<Secret>,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenConfig {
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the issuer or audience is empty.
    pub fn new(
        secret: Secret,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self, Error> {
        let issuer = issuer.into();
        let audience = audience.into();

        if issuer.trim().is_empty() {
            return Err(Error::Configuration("issuer must not be empty".to_string()));
        }
        if audience.trim().is_empty() {
            return Err(Error::Configuration("audience must not be empty".to_string()));
        }

        Ok(Self {
            secret: Arc::new(secret),
            issuer,
            audience,
            ttl: DEFAULT_TTL,
        })
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    #[must_use]
    pub fn audience(&self) -> &str {
        &self.audience
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn signer(&self) -> TokenSigner {
        TokenSigner::new(
            Arc::clone(&self.secret),
            self.issuer.clone(),
            self.audience.clone(),
            self.ttl,
        )
    }

    #[must_use]
    pub fn verifier(&self) -> TokenVerifier {
        TokenVerifier::new(
            Arc::clone(&self.secret),
            self.issuer.clone(),
            self.audience.clone(),
        )
    }
}
