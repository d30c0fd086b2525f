// otpauth://totp/<issuer>:<account>?secret=<base32>&issuer=<issuer>

use percent_encoding::percent_decode_str;
use url::Url;

use crate::account::Account;
use crate::base32::{self, DecodeError};
use crate::counter::STEP_MS;
use crate::hotp::DIGITS;

#[derive(Debug, thiserror::Error)]
pub enum UriError {
    #[error("not a valid URL")]
    Url(#[from] url::ParseError),
    #[error("not an otpauth://totp/ URI")]
    NotTotp,
    #[error("the URI does not contain a secret")]
    MissingSecret,
    #[error("invalid secret")]
    InvalidSecret(#[source] DecodeError),
    #[error("unsupported {parameter} {value:?}")]
    Unsupported {
        parameter: &'static str,
        value: String,
    },
}

/// Parses a provisioning URI into an [`Account`].
///
/// The `issuer` query parameter takes precedence over an `Issuer:` label prefix.
pub fn parse(uri: &str) -> Result<Account, UriError> {
    let url = Url::parse(uri.trim())?;
    let is_totp = url.host_str().is_some_and(|host| host.eq_ignore_ascii_case("totp"));
    if url.scheme() != "otpauth" || !is_totp {
        return Err(UriError::NotTotp);
    }

    let label = percent_decode_str(url.path().trim_start_matches('/'))
        .decode_utf8_lossy()
        .into_owned();
    let (label_issuer, name) = match label.split_once(':') {
        Some((issuer, name)) => (Some(issuer.trim().to_string()), name.trim().to_string()),
        None => (None, label.trim().to_string()),
    };

    let mut secret = None;
    let mut issuer = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "secret" => secret = Some(value.replace(' ', "")),
            "issuer" => issuer = Some(value.into_owned()),
            "algorithm" if !value.eq_ignore_ascii_case("SHA1") => {
                return Err(unsupported("algorithm", &value));
            }
            "digits" if value.parse::<usize>().ok() != Some(DIGITS) => {
                return Err(unsupported("digits", &value));
            }
            "period" if value.parse::<u64>().ok() != Some(STEP_MS / 1_000) => {
                return Err(unsupported("period", &value));
            }
            _ => {}
        }
    }

    let secret = secret.filter(|s| !s.is_empty()).ok_or(UriError::MissingSecret)?;
    base32::base32_decode(&secret).map_err(UriError::InvalidSecret)?;

    Ok(Account {
        name: if name.is_empty() { "unknown".to_string() } else { name },
        issuer: issuer.filter(|s| !s.is_empty()).or(label_issuer),
        secret,
    })
}

fn unsupported(parameter: &'static str, value: &str) -> UriError {
    UriError::Unsupported {
        parameter,
        value: value.to_string(),
    }
}
