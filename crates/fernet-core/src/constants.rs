//! Token layout constants.
//!
//! ```text
//! [version: 1] [timestamp: 8, big-endian] [IV: 16] [ciphertext: 16*n, n >= 1] [HMAC: 32]
//! ```

pub use fernet_crypto::hmac::HMAC_LEN;
pub use fernet_crypto::BLOCK_LEN;

/// The only token version this codec emits or accepts.
pub const VERSION: u8 = 0x80;

// Field sizes
pub const VERSION_LEN: usize = 1;
pub const TIMESTAMP_LEN: usize = 8;
pub const IV_LEN: usize = 16;

// Field offsets inside the signing base
pub const TIMESTAMP_OFFSET: usize = VERSION_LEN;
pub const IV_OFFSET: usize = TIMESTAMP_OFFSET + TIMESTAMP_LEN;
pub const CIPHERTEXT_OFFSET: usize = IV_OFFSET + IV_LEN; // 25

/// Shortest decoded token that is split into fields: an empty ciphertext.
/// Such a token still fails later because the ciphertext must hold a block.
pub const MIN_TOKEN_LEN: usize = CIPHERTEXT_OFFSET + HMAC_LEN; // 57

// Key material
pub const KEY_LEN: usize = 32;
pub const SIGNING_KEY_LEN: usize = 16;
pub const ENCRYPTION_KEY_LEN: usize = 16;

/// Decoded length of a token carrying a `message_len`-byte message.
#[must_use]
pub const fn raw_token_len(message_len: usize) -> usize {
    let padded = (message_len / BLOCK_LEN + 1) * BLOCK_LEN;
    CIPHERTEXT_OFFSET + padded + HMAC_LEN
}
