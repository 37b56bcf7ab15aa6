use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    InvalidPadding,
    InvalidHmac,
    InvalidLength { reason: &'static str },
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::InvalidPadding => write!(f, "invalid PKCS7 padding"),
            CryptoError::InvalidHmac => write!(f, "HMAC verification failed"),
            CryptoError::InvalidLength { reason } => write!(f, "invalid length: {reason}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CryptoError {}
