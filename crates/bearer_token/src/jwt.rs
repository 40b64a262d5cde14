use crate::{ClaimSet, Error, Secret};
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "HS256";
pub const TOKEN_TYPE: &str = "JWT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenHeader {
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl TokenHeader {
    fn hs256() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
        }
    }
}

/// Registered and private claims carried in the payload segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPayload {
    pub sub: String,
    pub jti: String,
    #[serde(
        rename = "role",
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "one_or_many"
    )]
    pub roles: Vec<String>,
    #[serde(deserialize_with = "numeric_date::deserialize")]
    pub iat: i64,
    #[serde(deserialize_with = "numeric_date::deserialize")]
    pub exp: i64,
    pub iss: String,
    /// Written as a single string; an array is accepted on the way in.
    #[serde(with = "one_or_many")]
    pub aud: Vec<String>,
}

/// A freshly minted compact token and its validity window (unix seconds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    pub token: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

// A single role is written as a string and several as an array, which is what
// most JWT libraries produce for a repeated claim. Both shapes are accepted.
mod one_or_many {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    pub fn serialize<S: Serializer>(values: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        match values {
            [single] => serializer.serialize_str(single),
            _ => values.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        })
    }
}

// NumericDate may carry a fraction. Rounding up keeps `now < exp` exact for
// whole-second clocks.
mod numeric_date {
    use serde::{Deserialize, Deserializer, de::Error as _};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumericDate {
        Whole(i64),
        Fraction(f64),
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match NumericDate::deserialize(deserializer)? {
            NumericDate::Whole(value) => Ok(value),
            NumericDate::Fraction(value) => {
                let rounded = value.ceil();
                if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
                    Ok(rounded as i64)
                } else {
                    Err(D::Error::custom("NumericDate out of range"))
                }
            }
        }
    }
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, Error> {
    let json = serde_json::to_vec(value)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d(segment: &str) -> Result<Vec<u8>, Error> {
    Base64UrlUnpadded::decode_vec(segment).map_err(|_| Error::MalformedToken)
}

fn keyed_mac(secret: &Secret) -> Result<HmacSha256, Error> {
    HmacSha256::new_from_slice(secret.expose())
        .map_err(|_| Error::Configuration("invalid HMAC key length".to_string()))
}

fn require_non_empty(value: &str, what: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::Configuration(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Sign `claims` into an HS256 compact JWT valid for `ttl` from `now_unix_seconds`.
///
/// # Errors
///
/// - [`Error::Configuration`] if the issuer or audience is empty, or `ttl`
///   overflows the expiry timestamp.
/// - [`Error::InvalidInput`] if the subject or token id claim is empty.
pub fn sign_hs256(
    claims: &ClaimSet,
    secret: &Secret,
    issuer: &str,
    audience: &str,
    ttl: Duration,
    now_unix_seconds: i64,
) -> Result<SignedToken, Error> {
    require_non_empty(issuer, "issuer")?;
    require_non_empty(audience, "audience")?;

    if claims.subject().trim().is_empty() {
        return Err(Error::InvalidInput("missing subject claim".to_string()));
    }
    if claims.token_id().trim().is_empty() {
        return Err(Error::InvalidInput("missing token id claim".to_string()));
    }

    let expires_at = i64::try_from(ttl.as_secs())
        .ok()
        .and_then(|ttl| now_unix_seconds.checked_add(ttl))
        .ok_or_else(|| Error::Configuration("token ttl is too large".to_string()))?;

    let payload = TokenPayload {
        sub: claims.subject().to_string(),
        jti: claims.token_id().to_string(),
        roles: claims.roles().to_vec(),
        iat: now_unix_seconds,
        exp: expires_at,
        iss: issuer.to_string(),
        aud: vec![audience.to_string()],
    };

    let header_b64 = b64e_json(&TokenHeader::hs256())?;
    let payload_b64 = b64e_json(&payload)?;
    let signing_input = format!("{header_b64}.{payload_b64}");

    let mut mac = keyed_mac(secret)?;
    mac.update(signing_input.as_bytes());
    let signature_b64 = Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes());

    Ok(SignedToken {
        token: format!("{signing_input}.{signature_b64}"),
        issued_at: now_unix_seconds,
        expires_at,
    })
}

/// Verify an HS256 compact JWT and return its claims.
///
/// The signature is checked before the header or payload JSON is parsed.
///
/// # Errors
///
/// - [`Error::MalformedToken`] for a wrong segment count, bad base64url, a
///   non-HS256 header or an unexpected payload shape.
/// - [`Error::InvalidSignature`] if the MAC does not match.
/// - [`Error::TokenExpired`] once `now_unix_seconds >= exp`.
/// - [`Error::InvalidIssuerOrAudience`] if `iss` or `aud` differ from the expected values.
pub fn verify_hs256(
    token: &str,
    secret: &Secret,
    expected_issuer: &str,
    expected_audience: &str,
    now_unix_seconds: i64,
) -> Result<ClaimSet, Error> {
    let mut parts = token.split('.');
    let header_b64 = parts.next().ok_or(Error::MalformedToken)?;
    let payload_b64 = parts.next().ok_or(Error::MalformedToken)?;
    let signature_b64 = parts.next().ok_or(Error::MalformedToken)?;
    if parts.next().is_some() {
        return Err(Error::MalformedToken);
    }

    let header_bytes = b64d(header_b64)?;
    let payload_bytes = b64d(payload_b64)?;
    let signature = b64d(signature_b64)?;

    let mut mac = keyed_mac(secret)?;
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(payload_b64.as_bytes());
    // verify_slice compares in constant time
    mac.verify_slice(&signature).map_err(|_| Error::InvalidSignature)?;

    let header: TokenHeader =
        serde_json::from_slice(&header_bytes).map_err(|_| Error::MalformedToken)?;
    // typ may be absent, but if present it must say JWT
    if header.alg != ALGORITHM || header.typ.as_deref().is_some_and(|typ| typ != TOKEN_TYPE) {
        return Err(Error::MalformedToken);
    }

    let payload: TokenPayload =
        serde_json::from_slice(&payload_bytes).map_err(|_| Error::MalformedToken)?;

    if now_unix_seconds >= payload.exp {
        return Err(Error::TokenExpired);
    }
    if payload.iss != expected_issuer || !payload.aud.iter().any(|aud| aud == expected_audience) {
        return Err(Error::InvalidIssuerOrAudience);
    }

    Ok(ClaimSet::new(payload.sub, payload.jti, payload.roles))
}
