use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::error::Error as StdError;

pub const DIGEST_LEN: usize = 20;

pub type Digest = [u8; DIGEST_LEN];

#[derive(Debug, thiserror::Error)]
#[error("keyed-hash provider failed: {message}")]
pub struct HashProviderError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl HashProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// HMAC-SHA1 (RFC 2104). Zero-length keys must be accepted.
pub trait KeyedHashProvider {
    fn hmac_sha1(&self, key: &[u8], message: &[u8; 8]) -> Result<Digest, HashProviderError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha1;

impl KeyedHashProvider for HmacSha1 {
    fn hmac_sha1(&self, key: &[u8], message: &[u8; 8]) -> Result<Digest, HashProviderError> {
        let mut mac = Hmac::<Sha1>::new_from_slice(key)
            .map_err(|e| HashProviderError::with_source("rejected key", e))?;
        mac.update(message);

        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&mac.finalize().into_bytes());
        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn matches_rfc4226_intermediate_values() {
        let key = b"12345678901234567890";
        let digest = HmacSha1.hmac_sha1(key, &0u64.to_be_bytes()).unwrap();
        assert_eq!(hex(&digest), "cc93cf18508d94934c64b65d8ba7667fb7cde4b0");

        let digest = HmacSha1.hmac_sha1(key, &1u64.to_be_bytes()).unwrap();
        assert_eq!(hex(&digest), "75a48a19d4cbe100644e8ac1397eea747a2d33ab");
    }

    #[test]
    fn accepts_empty_key() {
        let first = HmacSha1.hmac_sha1(&[], &[0; 8]).unwrap();
        let second = HmacSha1.hmac_sha1(&[], &[0; 8]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn accepts_keys_longer_than_block() {
        let key = [0xaa; 100];
        assert!(HmacSha1.hmac_sha1(&key, &[0; 8]).is_ok());
    }

    #[test]
    fn error_exposes_source() {
        let err = HashProviderError::with_source(
            "backend offline",
            std::io::Error::other("socket closed"),
        );
        assert_eq!(err.message(), "backend offline");
        assert_eq!(err.to_string(), "keyed-hash provider failed: backend offline");
        assert!(err.source().is_some());
        assert!(HashProviderError::new("x").source().is_none());
    }
}
