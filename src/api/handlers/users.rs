//! Profile lookup behind the bearer gate.
//!
//! A caller may always read its own profile. Reading anyone else's requires
//! the `Admin` role. The response never includes credential material.

use super::auth::Principal;
use crate::store::{Identity, SharedStore, normalize_username};
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, instrument};

pub const ADMIN_ROLE: &str = "Admin";

fn may_read(principal: &Principal, username: &str) -> bool {
    normalize_username(principal.username()) == normalize_username(username)
        || principal.has_role(ADMIN_ROLE)
}

#[utoipa::path(
    get,
    path = "/user/{username}",
    params(("username" = String, Path, description = "Username, any casing")),
    responses(
        (status = 200, description = "Public profile", body = Identity),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Caller is neither the user nor an Admin"),
        (status = 404, description = "No such user"),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
#[instrument(skip_all, fields(caller = %principal.username(), username = %username))]
pub async fn get_user(
    Extension(principal): Extension<Principal>,
    store: Extension<SharedStore>,
    Path(username): Path<String>,
) -> Response {
    if !may_read(&principal, &username) {
        debug!("forbidden profile read");
        return StatusCode::FORBIDDEN.into_response();
    }

    match store.find_by_name(&username).await {
        Ok(Some(identity)) => (StatusCode::OK, Json(identity)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to fetch user: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bearer_token::ClaimSet;

    #[test]
    fn self_or_admin() {
        let alice = Principal::from(ClaimSet::new("alice", "j1", Vec::<String>::new()));
        let root = Principal::from(ClaimSet::new("root", "j2", [ADMIN_ROLE]));
        let reader = Principal::from(ClaimSet::new("bob", "j3", ["Reader"]));

        assert!(may_read(&alice, "alice"));
        assert!(may_read(&alice, "ALICE"));
        assert!(!may_read(&alice, "root"));
        assert!(may_read(&root, "alice"));
        assert!(!may_read(&reader, "alice"));
    }
}
