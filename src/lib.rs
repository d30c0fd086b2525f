// TOTP (RFC 6238, HMAC-SHA1, 30 s step, 6 digits) for live 2FA codes

pub mod account;
pub mod base32;
pub mod clock;
pub mod config;
pub mod counter;
pub mod error;
pub mod hotp;
pub mod keyed_hash;
pub mod otpauth;
pub mod qrcode;
pub mod refresh;
pub mod totp;

pub use account::{Account, AccountSource};
pub use base32::{DecodeError, base32_decode};
pub use error::{Cause, GenerationFailed, Stage};
pub use keyed_hash::{HashProviderError, HmacSha1, KeyedHashProvider};
pub use totp::{TotpGenerator, generate};
