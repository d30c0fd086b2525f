use tracing::debug;

use crate::base32::base32_decode;
use crate::counter;
use crate::error::{GenerationFailed, Stage};
use crate::hotp;
use crate::keyed_hash::{HmacSha1, KeyedHashProvider};

// TOTP implementation (RFC 6238, SHA1, 30 s step, 6 digits)
#[derive(Debug, Clone, Default)]
pub struct TotpGenerator<P = HmacSha1> {
    provider: P,
}

impl TotpGenerator {
    pub fn new() -> Self {
        Self::with_provider(HmacSha1)
    }
}

impl<P: KeyedHashProvider> TotpGenerator<P> {
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    /// Derives the code for `secret` in the window containing `now_ms`.
    ///
    /// Pure in `(secret, now_ms / 30000)`. Errors are never retried here.
    pub fn generate(&self, secret: &str, now_ms: u64) -> Result<String, GenerationFailed> {
        let key = base32_decode(secret).inspect_err(|_| debug!(stage = %Stage::Decode, "secret rejected"))?;
        let moving_factor = counter::encode(now_ms);

        let code = hotp::hotp(&self.provider, &key, &moving_factor)?;
        debug!(counter = counter::counter(now_ms), "generated code");
        Ok(code)
    }

    pub fn time_remaining(&self, now_ms: u64) -> u64 {
        counter::seconds_remaining(now_ms)
    }
}

/// Generates a code with the default HMAC-SHA1 provider.
pub fn generate(secret: &str, now_ms: u64) -> Result<String, GenerationFailed> {
    TotpGenerator::new().generate(secret, now_ms)
}
