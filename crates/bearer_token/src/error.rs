use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("malformed token")]
    MalformedToken,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    TokenExpired,
    #[error("invalid issuer or audience")]
    InvalidIssuerOrAudience,
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Failures caused by the presented token rather than by the server.
    ///
    /// Callers at the HTTP boundary should answer all of these the same way
    /// so a client cannot tell a forged token from an expired one.
    #[must_use]
    pub const fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::MalformedToken
                | Self::InvalidSignature
                | Self::TokenExpired
                | Self::InvalidIssuerOrAudience
        )
    }
}
