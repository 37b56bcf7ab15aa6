//! Fernet key material.
//!
//! A key is 32 bytes, transported as URL-safe Base64. The first half signs
//! tokens with HMAC-SHA256 and the second half encrypts them with AES-128-CBC.
//! Both halves are wiped from memory when the key is dropped.

use core::fmt;
use core::str::FromStr;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::base64url;
use crate::constants::{ENCRYPTION_KEY_LEN, KEY_LEN, SIGNING_KEY_LEN};
use crate::error::FernetError;

/// Split a raw 32-byte key into `(signing_key, encryption_key)`.
///
/// # Errors
///
/// Returns [`FernetError::InvalidKey`] unless `raw` is exactly 32 bytes.
pub fn derive_keys(
    raw: &[u8],
) -> Result<([u8; SIGNING_KEY_LEN], [u8; ENCRYPTION_KEY_LEN]), FernetError> {
    if raw.len() != KEY_LEN {
        return Err(FernetError::InvalidKey(format!(
            "expected {KEY_LEN} bytes, got {}",
            raw.len()
        )));
    }
    let mut signing_key = [0u8; SIGNING_KEY_LEN];
    let mut encryption_key = [0u8; ENCRYPTION_KEY_LEN];
    signing_key.copy_from_slice(&raw[..SIGNING_KEY_LEN]);
    encryption_key.copy_from_slice(&raw[SIGNING_KEY_LEN..]);
    Ok((signing_key, encryption_key))
}

/// Generate a fresh random key, Base64URL-encoded.
#[must_use]
pub fn generate_key() -> String {
    FernetKey::generate().to_base64()
}

/// A validated 32-byte Fernet key, already split into its two halves.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct FernetKey {
    signing_key: [u8; SIGNING_KEY_LEN],
    encryption_key: [u8; ENCRYPTION_KEY_LEN],
}

impl FernetKey {
    /// Build a key from 32 raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FernetError::InvalidKey`] if `raw` is not 32 bytes long.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, FernetError> {
        let (signing_key, encryption_key) = derive_keys(raw)?;
        Ok(Self {
            signing_key,
            encryption_key,
        })
    }

    /// Parse a Base64URL key, padded or not.
    ///
    /// # Errors
    ///
    /// Returns [`FernetError::InvalidKey`] if the text is not valid Base64URL
    /// or does not decode to 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, FernetError> {
        let raw = Zeroizing::new(
            base64url::decode(encoded.trim())
                .map_err(|e| FernetError::InvalidKey(format!("not valid base64url: {e}")))?,
        );
        Self::from_bytes(&raw)
    }

    /// Generate a key from the operating system CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut raw = Zeroizing::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(&mut raw[..]);
        let mut signing_key = [0u8; SIGNING_KEY_LEN];
        let mut encryption_key = [0u8; ENCRYPTION_KEY_LEN];
        signing_key.copy_from_slice(&raw[..SIGNING_KEY_LEN]);
        encryption_key.copy_from_slice(&raw[SIGNING_KEY_LEN..]);
        Self {
            signing_key,
            encryption_key,
        }
    }

    /// Encode the full 32-byte key as unpadded Base64URL.
    #[must_use]
    pub fn to_base64(&self) -> String {
        let mut raw = Zeroizing::new([0u8; KEY_LEN]);
        raw[..SIGNING_KEY_LEN].copy_from_slice(&self.signing_key);
        raw[SIGNING_KEY_LEN..].copy_from_slice(&self.encryption_key);
        base64url::encode(&raw[..])
    }

    /// HMAC-SHA256 key, bytes `[0..16]` of the raw key.
    #[must_use]
    pub fn signing_key(&self) -> &[u8; SIGNING_KEY_LEN] {
        &self.signing_key
    }

    /// AES-128 key, bytes `[16..32]` of the raw key.
    #[must_use]
    pub fn encryption_key(&self) -> &[u8; ENCRYPTION_KEY_LEN] {
        &self.encryption_key
    }
}

impl FromStr for FernetKey {
    type Err = FernetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base64(s)
    }
}

impl fmt::Debug for FernetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FernetKey(..)")
    }
}
