//! HMAC-SHA256 message authentication.
//!
//! Provides HMAC-SHA256 computation and constant-time verification using the
//! `hmac` crate with `sha2::Sha256`.

use crate::CryptoError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of an HMAC-SHA256 tag in bytes.
pub const HMAC_LEN: usize = 32;

fn keyed(key: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any length")
}

/// Compute the HMAC-SHA256 of `data` using the given `key`.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; HMAC_LEN] {
    let mut mac = keyed(key);
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Verify that the HMAC-SHA256 of `data` under `key` matches `expected`.
///
/// The comparison is performed in constant time by the underlying `hmac`
/// crate, so the running time does not reveal how many leading bytes of the
/// tag were correct. A tag of the wrong length is rejected the same way.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidHmac`] if the tag does not match.
pub fn hmac_sha256_verify(key: &[u8], data: &[u8], expected: &[u8]) -> Result<(), CryptoError> {
    let mut mac = keyed(key);
    mac.update(data);
    mac.verify_slice(expected)
        .map_err(|_| CryptoError::InvalidHmac)
}
