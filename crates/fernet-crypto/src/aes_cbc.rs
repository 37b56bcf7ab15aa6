//! AES-128-CBC encryption and decryption.
//!
//! The cipher always runs with library-level padding disabled. PKCS#7 is
//! applied and removed by [`crate::pkcs7`] so the token codec controls exactly
//! how padding is validated. The IV is passed explicitly and is **not**
//! prepended to the ciphertext output.

extern crate alloc;
use alloc::vec::Vec;

use aes::Aes128;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::{CryptoError, BLOCK_LEN};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

fn check_block_aligned(data: &[u8]) -> Result<(), CryptoError> {
    if data.is_empty() {
        return Err(CryptoError::InvalidLength {
            reason: "input is empty",
        });
    }
    if data.len() % BLOCK_LEN != 0 {
        return Err(CryptoError::InvalidLength {
            reason: "input is not a multiple of the AES block size",
        });
    }
    Ok(())
}

/// Encrypt already block-aligned `blocks` with AES-128-CBC and no padding.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidLength`] if `blocks` is empty or not a
/// multiple of 16 bytes.
pub fn aes128_cbc_encrypt_blocks(
    key: &[u8; 16],
    iv: &[u8; 16],
    blocks: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    check_block_aligned(blocks)?;
    Ok(Aes128CbcEnc::new(key.into(), iv.into()).encrypt_padded_vec_mut::<NoPadding>(blocks))
}

/// Decrypt `ciphertext` with AES-128-CBC, leaving any padding in place.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidLength`] if `ciphertext` is empty or not a
/// multiple of 16 bytes.
pub fn aes128_cbc_decrypt_blocks(
    key: &[u8; 16],
    iv: &[u8; 16],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    check_block_aligned(ciphertext)?;
    Aes128CbcDec::new(key.into(), iv.into())
        .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        .map_err(|_| CryptoError::InvalidLength {
            reason: "input is not a multiple of the AES block size",
        })
}

/// PKCS#7-pad `plaintext` and encrypt it with AES-128-CBC.
///
/// The result is always a non-empty multiple of 16 bytes.
#[must_use]
pub fn aes128_cbc_encrypt(key: &[u8; 16], iv: &[u8; 16], plaintext: &[u8]) -> Vec<u8> {
    let padded = crate::pkcs7::pkcs7_pad(plaintext, BLOCK_LEN);
    // Padded input is block-aligned, so NoPadding cannot fail here.
    Aes128CbcEnc::new(key.into(), iv.into()).encrypt_padded_vec_mut::<NoPadding>(&padded)
}

/// Decrypt `ciphertext` with AES-128-CBC and strip PKCS#7 padding.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidLength`] for empty or misaligned input and
/// [`CryptoError::InvalidPadding`] if the decrypted padding is malformed.
pub fn aes128_cbc_decrypt(
    key: &[u8; 16],
    iv: &[u8; 16],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let padded = aes128_cbc_decrypt_blocks(key, iv, ciphertext)?;
    let unpadded = crate::pkcs7::pkcs7_unpad(&padded, BLOCK_LEN)?;
    Ok(unpadded.to_vec())
}
