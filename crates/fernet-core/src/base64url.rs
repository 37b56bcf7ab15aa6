//! URL-safe Base64 without padding, as used for keys and tokens.
//!
//! Encoding never emits `=`. Decoding first completes the `=` run to a
//! multiple of 4 characters, so unpadded, padded and partially padded input
//! are all accepted. Characters outside the URL-safe alphabet, impossible
//! lengths and non-canonical trailing bits are rejected.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

pub use base64::DecodeError;

const URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Encode `bytes` as unpadded URL-safe Base64.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE.encode(bytes)
}

/// Decode URL-safe Base64 after padding `input` with `=` to a multiple of 4.
///
/// # Errors
///
/// Returns a [`DecodeError`] for invalid symbols, an impossible length, or
/// non-zero trailing bits in the final symbol.
pub fn decode(input: &str) -> Result<Vec<u8>, DecodeError> {
    let missing = (4 - input.len() % 4) % 4;
    if missing == 0 {
        return URL_SAFE.decode(input);
    }
    let mut padded = String::with_capacity(input.len() + missing);
    padded.push_str(input);
    padded.extend(std::iter::repeat('=').take(missing));
    URL_SAFE.decode(padded)
}
