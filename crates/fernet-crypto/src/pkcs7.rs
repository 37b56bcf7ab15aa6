//! PKCS#7 padding and unpadding.
//!
//! Fernet pads every message to the AES block size before encryption and
//! rejects any decrypted buffer whose trailing padding is not well formed.
//! Both directions take the block size explicitly so that the unpadding side
//! can refuse a pad length larger than one block.

extern crate alloc;
use alloc::vec::Vec;

use crate::CryptoError;

/// Pad `data` to a multiple of `block_size` using PKCS#7.
///
/// If the data length is already a multiple of `block_size`, a full block of
/// padding is appended, so there is always at least one byte of padding.
///
/// # Panics
///
/// Panics if `block_size` is 0 or greater than 255.
#[must_use]
pub fn pkcs7_pad(data: &[u8], block_size: usize) -> Vec<u8> {
    assert!(
        (1..=255).contains(&block_size),
        "PKCS7 block_size must be in 1..=255, got {block_size}"
    );

    let pad_len = block_size - (data.len() % block_size);
    let pad_byte = pad_len as u8;

    let mut out = Vec::with_capacity(data.len() + pad_len);
    out.extend_from_slice(data);
    out.resize(data.len() + pad_len, pad_byte);
    out
}

/// Remove PKCS#7 padding from `data`, returning the unpadded prefix.
///
/// The last byte is read as the pad length `n`. The padding is accepted only
/// when `1 <= n <= block_size`, `n <= data.len()`, and each of the last `n`
/// bytes equals `n`.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidPadding`] for any malformed padding,
/// including empty input.
pub fn pkcs7_unpad(data: &[u8], block_size: usize) -> Result<&[u8], CryptoError> {
    let Some(&pad_byte) = data.last() else {
        return Err(CryptoError::InvalidPadding);
    };
    let pad_len = pad_byte as usize;

    if pad_len == 0 || pad_len > block_size || pad_len > data.len() {
        return Err(CryptoError::InvalidPadding);
    }

    let content_len = data.len() - pad_len;
    // Fold over every padding byte instead of returning at the first mismatch.
    let mismatch = data[content_len..]
        .iter()
        .fold(0u8, |acc, &b| acc | (b ^ pad_byte));
    if mismatch != 0 {
        return Err(CryptoError::InvalidPadding);
    }

    Ok(&data[..content_len])
}
