use std::fmt;

use crate::base32::DecodeError;
use crate::keyed_hash::HashProviderError;

/// Pipeline step that aborted a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decode,
    Hash,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Decode => f.write_str("secret decoding"),
            Stage::Hash => f.write_str("keyed hashing"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Cause {
    #[error(transparent)]
    InvalidCharacter(#[from] DecodeError),
    #[error(transparent)]
    HashProviderFailure(#[from] HashProviderError),
}

/// Error surfaced by [`crate::totp::TotpGenerator::generate`].
#[derive(Debug, thiserror::Error)]
#[error("code generation failed during {stage}")]
pub struct GenerationFailed {
    stage: Stage,
    #[source]
    cause: Cause,
}

impl GenerationFailed {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    pub fn into_cause(self) -> Cause {
        self.cause
    }
}

impl From<DecodeError> for GenerationFailed {
    fn from(err: DecodeError) -> Self {
        Self {
            stage: Stage::Decode,
            cause: err.into(),
        }
    }
}

impl From<HashProviderError> for GenerationFailed {
    fn from(err: HashProviderError) -> Self {
        Self {
            stage: Stage::Hash,
            cause: err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn decode_failure_names_stage_and_character() {
        let err = GenerationFailed::from(DecodeError::InvalidCharacter('0'));
        assert_eq!(err.stage(), Stage::Decode);
        assert_eq!(err.to_string(), "code generation failed during secret decoding");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("invalid base32 character '0'")
        );
        assert!(matches!(
            err.into_cause(),
            Cause::InvalidCharacter(DecodeError::InvalidCharacter('0'))
        ));
    }

    #[test]
    fn hash_failure_is_carried_unchanged() {
        let err = GenerationFailed::from(HashProviderError::new("unavailable"));
        assert_eq!(err.stage(), Stage::Hash);
        match err.cause() {
            Cause::HashProviderFailure(inner) => assert_eq!(inner.message(), "unavailable"),
            other => panic!("unexpected cause: {other:?}"),
        }
    }
}
