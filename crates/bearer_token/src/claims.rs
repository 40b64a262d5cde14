use uuid::Uuid;

pub const SUBJECT_CLAIM: &str = "sub";
pub const TOKEN_ID_CLAIM: &str = "jti";
pub const ROLE_CLAIM: &str = "role";

/// Claims embedded in an access token for one authenticated identity.
///
/// Exactly one subject and one token id; zero or more roles kept in the order
/// the caller supplied them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    subject: String,
    token_id: String,
    roles: Vec<String>,
}

impl ClaimSet {
    /// Claims for `identity_name` with a freshly generated token id.
    ///
    /// The token id is a random (v4) UUID, so two calls never share one.
    pub fn build<I, S>(identity_name: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(identity_name, Uuid::new_v4().to_string(), roles)
    }

    /// Claims with an explicit token id, used when decoding a verified token.
    pub fn new<I, S>(subject: impl Into<String>, token_id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject: subject.into(),
            token_id: token_id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// The claims as ordered `(key, value)` pairs: subject, token id, then one
    /// entry per role.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (SUBJECT_CLAIM, self.subject.as_str()),
            (TOKEN_ID_CLAIM, self.token_id.as_str()),
        ]
        .into_iter()
        .chain(self.roles.iter().map(|role| (ROLE_CLAIM, role.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_emits_subject_token_id_and_roles_in_order() {
        let claims = ClaimSet::build("alice", ["Admin", "Reader"]);

        let pairs: Vec<_> = claims.iter().collect();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0], (SUBJECT_CLAIM, "alice"));
        assert_eq!(pairs[1].0, TOKEN_ID_CLAIM);
        assert_eq!(pairs[2], (ROLE_CLAIM, "Admin"));
        assert_eq!(pairs[3], (ROLE_CLAIM, "Reader"));

        assert_eq!(
            pairs.iter().filter(|(key, _)| *key == SUBJECT_CLAIM).count(),
            1
        );
        assert_eq!(
            pairs.iter().filter(|(key, _)| *key == TOKEN_ID_CLAIM).count(),
            1
        );
    }

    #[test]
    fn token_id_is_a_fresh_uuid() {
        let a = ClaimSet::build("alice", Vec::<String>::new());
        let b = ClaimSet::build("alice", Vec::<String>::new());

        assert_ne!(a.token_id(), b.token_id());
        assert!(Uuid::parse_str(a.token_id()).is_ok());
        assert_eq!(a.token_id().len(), 36);
    }

    #[test]
    fn role_lookup() {
        let claims = ClaimSet::new("bob", "jti-1", ["Reader"]);

        assert!(claims.has_role("Reader"));
        assert!(!claims.has_role("Admin"));
        assert!(!claims.has_role("reader"));
        assert_eq!(claims.roles(), ["Reader".to_string()]);
    }

    #[test]
    fn no_roles_yields_two_claims() {
        let claims = ClaimSet::new("carol", "jti-2", Vec::<String>::new());
        assert_eq!(claims.iter().count(), 2);
        assert!(claims.roles().is_empty());
    }
}
