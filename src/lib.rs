//! # Tokengate (password login → bearer tokens)
//!
//! `tokengate` authenticates API clients with a username and password and hands
//! back a short-lived, HMAC-signed bearer token (HS256 JWT). Protected routes
//! accept the token in `Authorization: Bearer <token>` and authorize on the
//! roles it carries.
//!
//! ## Flow
//!
//! 1. `POST /register` stores a user with an Argon2id password hash.
//! 2. `POST /login` verifies the password, builds the claims (`sub`, a random
//!    `jti`, one `role` per role) and signs them with the process-wide secret.
//! 3. Protected routes run the bearer gate, which validates signature, expiry,
//!    issuer and audience before the handler sees any claim.
//!
//! Tokens live only on the client. There is no server-side session, refresh or
//! revocation: expiry is the only way a token stops working.
//!
//! ## Storage
//!
//! With `--dsn` the credential store is `PostgreSQL` (see `db/sql/schema.sql`);
//! without it an in-memory store is used, which is handy for local runs and
//! for the test-suite.

pub mod api;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(GIT_COMMIT_HASH.len() >= 7);
    }
}
