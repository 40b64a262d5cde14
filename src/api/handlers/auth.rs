//! Bearer gate for protected routes.
//!
//! Reads `Authorization: Bearer <token>`, validates it with the shared
//! [`TokenVerifier`] and injects a [`Principal`] into the request extensions.
//! Every failure is a bare 401; the specific reason only goes to the log.

use axum::{
    extract::{Extension, Request},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use bearer_token::{ClaimSet, TokenVerifier};
use tracing::{debug, warn};

/// Caller identity taken from a verified token.
#[derive(Clone, Debug)]
pub struct Principal {
    claims: ClaimSet,
}

impl Principal {
    #[must_use]
    pub fn username(&self) -> &str {
        self.claims.subject()
    }

    #[must_use]
    pub fn token_id(&self) -> &str {
        self.claims.token_id()
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.claims.has_role(role)
    }
}

impl From<ClaimSet> for Principal {
    fn from(claims: ClaimSet) -> Self {
        Self { claims }
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// The scheme is matched case-insensitively.
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Middleware: reject the request with 401 unless it carries a valid token.
///
/// # Errors
///
/// Returns [`StatusCode::UNAUTHORIZED`] when the header is missing or the
/// token fails verification.
pub async fn require_bearer(
    Extension(verifier): Extension<TokenVerifier>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(token) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
    else {
        debug!("missing or unusable Authorization header");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let claims = match verifier.validate(token) {
        Ok(claims) => claims,
        Err(err) => {
            warn!("rejected bearer token: {err}");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let principal = Principal::from(claims);
    debug!(
        username = principal.username(),
        jti = principal.token_id(),
        "authenticated"
    );
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
