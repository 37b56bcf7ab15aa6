//! Error types for the token codec and payload adapter.

use fernet_crypto::CryptoError;

/// Every way a Fernet operation can fail.
///
/// Decode failures are deliberately fine-grained so that callers can log the
/// exact reason. User-facing responses should collapse them with
/// [`FernetError::is_token_rejection`] instead of echoing the variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FernetError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("malformed token: {reason}")]
    MalformedToken { reason: &'static str },

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("unsupported token version: {0:#04x}")]
    UnsupportedVersion(u8),

    #[error("token expired: issued at {timestamp}, ttl {ttl}s, now {now}")]
    ExpiredToken { timestamp: u64, ttl: u64, now: u64 },

    #[error("payload serialization error: {0}")]
    Serialization(String),
}

impl FernetError {
    /// Stable snake_case name of the variant, suitable for log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FernetError::InvalidKey(_) => "invalid_key",
            FernetError::InvalidArgument(_) => "invalid_argument",
            FernetError::MalformedToken { .. } => "malformed_token",
            FernetError::InvalidSignature => "invalid_signature",
            FernetError::UnsupportedVersion(_) => "unsupported_version",
            FernetError::ExpiredToken { .. } => "expired_token",
            FernetError::Serialization(_) => "serialization",
        }
    }

    /// `true` for failures that mean "this token must not be accepted".
    #[must_use]
    pub fn is_token_rejection(&self) -> bool {
        !matches!(
            self,
            FernetError::InvalidKey(_) | FernetError::InvalidArgument(_)
        )
    }

    pub(crate) fn from_decrypt(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidPadding => FernetError::MalformedToken {
                reason: "invalid padding",
            },
            CryptoError::InvalidLength { .. } => FernetError::MalformedToken {
                reason: "ciphertext is not a positive multiple of the block size",
            },
            CryptoError::InvalidHmac => FernetError::InvalidSignature,
        }
    }
}
