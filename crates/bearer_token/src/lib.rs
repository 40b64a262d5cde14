//! # bearer_token
//!
//! Issuance and verification of HS256 access tokens in JWT compact
//! serialization (`header.payload.signature`, each segment unpadded base64url).
//!
//! - [`ClaimSet::build`] assembles the subject, a random token id (`jti`) and
//!   the identity's roles.
//! - [`TokenSigner`] signs claims with the shared [`Secret`] and stamps `iss`,
//!   `aud`, `iat` and `exp`.
//! - [`TokenVerifier`] checks the MAC first, then expiry, then issuer and
//!   audience, and only then hands the claims back.
//!
//! The algorithm is fixed to HMAC-SHA-256. There is no negotiation, no
//! revocation and no clock-skew leeway; expiry ends a token's life.

mod claims;
mod config;
mod error;
mod jwt;
mod secret;
mod signer;
mod verifier;

pub use claims::{ClaimSet, ROLE_CLAIM, SUBJECT_CLAIM, TOKEN_ID_CLAIM};
pub use config::{DEFAULT_TTL, TokenConfig};
pub use error::Error;
pub use jwt::{
    ALGORITHM, SignedToken, TOKEN_TYPE, TokenHeader, TokenPayload, sign_hs256, verify_hs256,
};
pub use secret::{MIN_SECRET_BYTES, Secret};
pub use signer::TokenSigner;
pub use verifier::TokenVerifier;

use std::time::SystemTime;

#[must_use]
pub fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
