use anyhow::Result;
use bearer_token::Secret;

/// Print a fresh 256-bit secret as unpadded base64url.
pub fn execute() -> Result<()> {
    println!("{}", encoded());
    Ok(())
}

fn encoded() -> String {
    Secret::generate().to_base64url()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64ct::{Base64UrlUnpadded, Encoding};

    #[test]
    fn output_decodes_to_32_bytes() -> Result<()> {
        let encoded = encoded();
        assert_eq!(encoded.len(), 43);
        let bytes = Base64UrlUnpadded::decode_vec(&encoded)
            .map_err(|err| anyhow::anyhow!("not base64url: {err}"))?;
        assert_eq!(bytes.len(), 32);
        assert_ne!(encoded, super::encoded());
        Ok(())
    }
}
