use super::{StatusMessage, valid_email, valid_password};
use crate::store::{NewUser, SharedStore, StoreError};
use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use secrecy::SecretString;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize)]
pub struct UserRegister {
    username: String,
    email: String,
    password: String,
}

impl fmt::Debug for UserRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRegister")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl UserRegister {
    /// Normalize and check the fields, returning the message for a 400.
    fn into_new_user(self) -> Result<NewUser, &'static str> {
        let username = self.username.trim().to_string();
        let email = self.email.trim().to_lowercase();

        if username.is_empty() {
            return Err("Invalid username");
        }

        if !valid_email(&email) {
            return Err("Invalid email");
        }

        if !valid_password(&self.password) {
            return Err("Invalid password");
        }

        Ok(NewUser {
            username,
            email,
            password: SecretString::from(self.password),
        })
    }
}

#[utoipa::path(
    post,
    path= "/register",
    request_body = UserRegister,
    responses (
        (status = 200, description = "Registration successful", body = StatusMessage, content_type = "application/json"),
        (status = 400, description = "Missing or invalid username or email, or a password below policy", body = StatusMessage),
        (status = 409, description = "User with the specified username already exists", body = StatusMessage),
        (status = 500, description = "User could not be created", body = StatusMessage),
    ),
    tag= "auth"
)]
#[instrument(skip(store, payload))]
pub async fn register(
    store: Extension<SharedStore>,
    payload: Result<Json<UserRegister>, JsonRejection>,
) -> Response {
    let user = match payload {
        Ok(Json(payload)) => payload,
        Err(err) => {
            debug!("rejected register payload: {err}");
            return StatusMessage::reply(StatusCode::BAD_REQUEST, "Missing or invalid payload");
        }
    };

    debug!("user: {:?}", user);

    let new_user = match user.into_new_user() {
        Ok(new_user) => new_user,
        Err(message) => return StatusMessage::reply(StatusCode::BAD_REQUEST, message),
    };

    match store.create(new_user).await {
        Ok(identity) => {
            info!(username = %identity.username, "user registered");
            StatusMessage::reply(StatusCode::OK, "User created successfully!")
        }
        Err(StoreError::Conflict(username)) => {
            error!("User already exists: {username}");
            StatusMessage::reply(StatusCode::CONFLICT, "User already exists")
        }
        Err(err) => {
            error!("Error creating user: {err}");
            StatusMessage::reply(StatusCode::INTERNAL_SERVER_ERROR, "Error creating user")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn request(username: &str, email: &str, password: &str) -> UserRegister {
        UserRegister {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn fields_are_normalized() -> Result<(), &'static str> {
        let user = request("  Alice ", " Alice@Example.COM ", "Pw-al1ce").into_new_user()?;
        assert_eq!(user.username, "Alice");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.password.expose_secret(), "Pw-al1ce");
        Ok(())
    }

    #[test]
    fn invalid_fields_are_named() {
        assert!(matches!(
            request(" ", "a@b.io", "Pw-al1ce").into_new_user(),
            Err("Invalid username")
        ));
        assert!(matches!(
            request("alice", "not-an-email", "Pw-al1ce").into_new_user(),
            Err("Invalid email")
        ));
        for weak in ["", "a", "pw-alice", "Pw-alice"] {
            assert!(matches!(
                request("alice", "a@b.io", weak).into_new_user(),
                Err("Invalid password")
            ));
        }
    }
}
