use crate::Error;
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{RngCore, rngs::OsRng};
use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// Minimum HMAC key length accepted for signing and verification (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

/// Symmetric key material shared by the signer and the verifier.
pub struct Secret(SecretBox<Vec<u8>>);

impl Secret {
    /// Wrap raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the key is empty or shorter than
    /// [`MIN_SECRET_BYTES`].
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, Error> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(Error::Configuration("signing secret is empty".to_string()));
        }
        if bytes.len() < MIN_SECRET_BYTES {
            return Err(Error::Configuration(format!(
                "signing secret must be at least {MIN_SECRET_BYTES} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(SecretBox::new(Box::new(bytes))))
    }

    /// Fresh random key of [`MIN_SECRET_BYTES`] from the OS CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = vec![0_u8; MIN_SECRET_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(SecretBox::new(Box::new(bytes)))
    }

    /// Unpadded base64url rendering, suitable for an environment variable.
    #[must_use]
    pub fn to_base64url(&self) -> String {
        Base64UrlUnpadded::encode_string(self.expose())
    }

    pub(crate) fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_short_keys() {
        assert!(matches!(Secret::new(Vec::new()), Err(Error::Configuration(_))));
        assert!(matches!(
            Secret::new("too-short".as_bytes()),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            Secret::new(vec![7_u8; MIN_SECRET_BYTES - 1]),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn accepts_minimum_length() -> Result<(), Error> {
        let secret = Secret::new(vec![7_u8; MIN_SECRET_BYTES])?;
        assert_eq!(secret.expose().len(), MIN_SECRET_BYTES);
        Ok(())
    }

    #[test]
    fn generated_keys_differ() -> Result<(), Error> {
        let a = Secret::generate();
        let b = Secret::generate();
        assert_ne!(a.to_base64url(), b.to_base64url());

        // 32 bytes -> 43 unpadded base64url characters, and it round-trips as a key.
        let encoded = a.to_base64url();
        assert_eq!(encoded.len(), 43);
        Secret::new(encoded.as_bytes())?;
        Ok(())
    }

    #[test]
    fn debug_does_not_leak() -> Result<(), Error> {
        let secret = Secret::new("a-very-long-random-secret-value-1234567890".as_bytes())?;
        let rendered = format!("{secret:?}");
        assert_eq!(rendered, "Secret([REDACTED])");
        Ok(())
    }
}
