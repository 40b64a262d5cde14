//! Route handlers and the small helpers they share.

pub mod auth;
pub mod health;
pub mod user_login;
pub mod user_register;
pub mod users;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every non-token reply from `/login` and `/register`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub success: bool,
    pub message: String,
}

impl StatusMessage {
    pub(crate) fn reply(status: StatusCode, message: impl Into<String>) -> Response {
        let body = Self {
            success: status.is_success(),
            message: message.into(),
        };
        (status, Json(body)).into_response()
    }
}

/// Lightweight email sanity check run before anything is stored.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Registration password policy: at least six characters with an upper and
/// a lower case letter, a digit and a symbol.
pub fn valid_password(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN_LENGTH
        && password.chars().any(char::is_uppercase)
        && password.chars().any(char::is_lowercase)
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_alphanumeric())
}
