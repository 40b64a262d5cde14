use super::StatusMessage;
use crate::store::SharedStore;
use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bearer_token::{ClaimSet, SignedToken, TokenSigner};
use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize)]
pub struct UserLogin {
    username: String,
    password: String,
}

impl fmt::Debug for UserLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserLogin")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl UserLogin {
    fn missing_field(&self) -> Option<&'static str> {
        if self.username.trim().is_empty() {
            Some("Username is required")
        } else if self.password.is_empty() {
            Some("Password is required")
        } else {
            None
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginToken {
    pub token: String,
    /// RFC 3339, UTC.
    pub expiration: String,
}

impl TryFrom<SignedToken> for LoginToken {
    type Error = String;

    fn try_from(signed: SignedToken) -> Result<Self, Self::Error> {
        let expiration = DateTime::from_timestamp(signed.expires_at, 0)
            .ok_or_else(|| format!("expiry out of range: {}", signed.expires_at))?
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        Ok(Self {
            token: signed.token,
            expiration,
        })
    }
}

#[utoipa::path(
    post,
    path= "/login",
    request_body = UserLogin,
    responses (
        (status = 200, description = "Credentials accepted, bearer token issued", body = LoginToken),
        (status = 400, description = "Missing payload, blank username or password, or token could not be issued", body = StatusMessage),
        (status = 401, description = "Unknown user or wrong password"),
    ),
    tag= "auth"
)]
#[instrument(skip(store, signer, payload))]
pub async fn login(
    store: Extension<SharedStore>,
    signer: Extension<TokenSigner>,
    payload: Result<Json<UserLogin>, JsonRejection>,
) -> Response {
    let user = match payload {
        Ok(Json(payload)) => payload,
        Err(err) => {
            debug!("rejected login payload: {err}");
            return StatusMessage::reply(StatusCode::BAD_REQUEST, "Missing or invalid payload");
        }
    };

    debug!("user: {:?}", user);

    if let Some(message) = user.missing_field() {
        return StatusMessage::reply(StatusCode::BAD_REQUEST, message);
    }

    let identity = match store.verify(&user.username, &user.password).await {
        Ok(Some(identity)) => identity,
        Ok(None) => {
            info!(username = %user.username, "login refused");
            return StatusCode::UNAUTHORIZED.into_response();
        }
        Err(err) => {
            error!("Error verifying credentials: {err}");
            return StatusMessage::reply(StatusCode::BAD_REQUEST, "Could not verify credentials");
        }
    };

    let claims = ClaimSet::build(identity.username, identity.roles);

    let issued = signer
        .sign(&claims)
        .map_err(|err| err.to_string())
        .and_then(LoginToken::try_from);

    match issued {
        Ok(token) => {
            info!(username = claims.subject(), jti = claims.token_id(), "token issued");
            (StatusCode::OK, Json(token)).into_response()
        }
        Err(err) => {
            error!("Error issuing token: {err}");
            StatusMessage::reply(StatusCode::BAD_REQUEST, "Could not issue token")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiration_is_rfc3339_utc() -> Result<(), String> {
        let token = LoginToken::try_from(SignedToken {
            token: "a.b.c".to_string(),
            issued_at: 1_700_000_000,
            expires_at: 1_700_000_600,
        })?;
        assert_eq!(token.expiration, "2023-11-14T22:23:20Z");
        assert_eq!(token.token, "a.b.c");
        Ok(())
    }

    #[test]
    fn blank_fields_are_reported() {
        let login = |username: &str, password: &str| UserLogin {
            username: username.to_string(),
            password: password.to_string(),
        };
        assert_eq!(login(" ", "pw").missing_field(), Some("Username is required"));
        assert_eq!(login("alice", "").missing_field(), Some("Password is required"));
        assert_eq!(login("alice", "pw").missing_field(), None);
    }

    #[test]
    fn debug_hides_password() {
        let login = UserLogin {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{login:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
