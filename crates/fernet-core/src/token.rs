//! The Fernet token codec.
//!
//! # Token layout
//!
//! ```text
//! [version 0x80: 1] || [timestamp BE: 8] || [IV: 16] || [ciphertext: 16*n] || [HMAC-SHA256: 32]
//! ```
//!
//! Everything before the HMAC is the signing base. The whole blob is encoded
//! as unpadded URL-safe Base64.
//!
//! # Decode order
//!
//! The HMAC is verified before any other field is read. Only a token that
//! passes that check is split into a [`SignedToken`], and every later check
//! (version, TTL, block alignment, padding) runs on that verified view.

use fernet_crypto::aes_cbc::{aes128_cbc_decrypt, aes128_cbc_encrypt};
use fernet_crypto::hmac::{hmac_sha256, hmac_sha256_verify};

use crate::base64url;
use crate::constants::{
    BLOCK_LEN, CIPHERTEXT_OFFSET, HMAC_LEN, IV_LEN, IV_OFFSET, MIN_TOKEN_LEN,
    TIMESTAMP_LEN, TIMESTAMP_OFFSET, VERSION,
};
use crate::error::FernetError;
use crate::key::FernetKey;
use crate::provider::{Clock, IvSource, OsRngIv, SystemClock};

/// Fernet encoder/decoder bound to one key.
///
/// The key is read-only after construction and the providers take `&self`,
/// so one instance can be shared across threads.
pub struct Fernet<C = SystemClock, R = OsRngIv> {
    key: FernetKey,
    clock: C,
    iv_source: R,
}

impl Fernet {
    /// Create a codec from a Base64URL key using the system clock and OS RNG.
    ///
    /// # Errors
    ///
    /// Returns [`FernetError::InvalidKey`] if the key does not decode to
    /// exactly 32 bytes.
    pub fn new(key: &str) -> Result<Self, FernetError> {
        Ok(Self::from_key(FernetKey::from_base64(key)?))
    }

    /// Create a codec from an already parsed key.
    #[must_use]
    pub fn from_key(key: FernetKey) -> Self {
        Self::with_providers(key, SystemClock, OsRngIv)
    }

    /// Generate a fresh random key, Base64URL-encoded.
    #[must_use]
    pub fn generate_key() -> String {
        crate::key::generate_key()
    }
}

impl<C: Clock, R: IvSource> Fernet<C, R> {
    /// Create a codec with explicit time and IV sources.
    pub fn with_providers(key: FernetKey, clock: C, iv_source: R) -> Self {
        Self {
            key,
            clock,
            iv_source,
        }
    }

    /// The key this codec signs and encrypts with.
    pub fn key(&self) -> &FernetKey {
        &self.key
    }

    /// Encrypt and sign `message`, stamping it with the clock's current time
    /// and a fresh IV.
    #[must_use]
    pub fn encode(&self, message: &[u8]) -> String {
        let iv = self.iv_source.next_iv();
        self.encode_at_time_with_iv(message, self.clock.now(), &iv)
    }

    /// Encrypt and sign `message` with a caller-chosen timestamp and IV.
    ///
    /// Deterministic: the same key, message, timestamp and IV always give the
    /// same token. Never reuse an IV outside of tests.
    #[must_use]
    pub fn encode_at_time_with_iv(
        &self,
        message: &[u8],
        timestamp: u64,
        iv: &[u8; IV_LEN],
    ) -> String {
        let ciphertext = aes128_cbc_encrypt(self.key.encryption_key(), iv, message);

        let mut token = Vec::with_capacity(CIPHERTEXT_OFFSET + ciphertext.len() + HMAC_LEN);
        token.push(VERSION);
        token.extend_from_slice(&timestamp.to_be_bytes());
        token.extend_from_slice(iv);
        token.extend_from_slice(&ciphertext);

        let tag = hmac_sha256(self.key.signing_key(), &token);
        token.extend_from_slice(&tag);

        tracing::trace!(
            message_len = message.len(),
            timestamp,
            token_len = token.len(),
            "issued token"
        );
        base64url::encode(&token)
    }

    /// Verify and decrypt `token`.
    ///
    /// With `ttl` set, tokens older than `ttl` seconds are rejected. A token
    /// stamped later than `now` is never too old, so it is accepted.
    ///
    /// # Errors
    ///
    /// - [`FernetError::MalformedToken`]: bad Base64, too short, ciphertext
    ///   not block aligned, or invalid padding after decryption
    /// - [`FernetError::InvalidSignature`]: HMAC mismatch
    /// - [`FernetError::UnsupportedVersion`]: version byte is not `0x80`
    /// - [`FernetError::ExpiredToken`]: `timestamp + ttl < now`
    pub fn decode(&self, token: &str, ttl: Option<u64>) -> Result<Vec<u8>, FernetError> {
        self.decode_at_time(token, ttl, self.clock.now())
    }

    /// [`decode`](Self::decode) against an explicit current time.
    ///
    /// # Errors
    ///
    /// Same as [`decode`](Self::decode).
    pub fn decode_at_time(
        &self,
        token: &str,
        ttl: Option<u64>,
        now: u64,
    ) -> Result<Vec<u8>, FernetError> {
        let raw = decode_raw(token)?;
        let signed = SignedToken::verify(&self.key, &raw)?;

        if let Some(ttl) = ttl {
            if signed.timestamp.saturating_add(ttl) < now {
                return Err(FernetError::ExpiredToken {
                    timestamp: signed.timestamp,
                    ttl,
                    now,
                });
            }
        }

        if signed.ciphertext.is_empty() || signed.ciphertext.len() % BLOCK_LEN != 0 {
            return Err(FernetError::MalformedToken {
                reason: "ciphertext is not a positive multiple of the block size",
            });
        }

        let plaintext =
            aes128_cbc_decrypt(self.key.encryption_key(), &signed.iv, signed.ciphertext)
                .map_err(FernetError::from_decrypt)?;

        tracing::trace!(
            timestamp = signed.timestamp,
            message_len = plaintext.len(),
            "accepted token"
        );
        Ok(plaintext)
    }

    /// Verify `token`'s signature and return its issue timestamp without
    /// decrypting it.
    ///
    /// # Errors
    ///
    /// [`FernetError::MalformedToken`], [`FernetError::InvalidSignature`] or
    /// [`FernetError::UnsupportedVersion`], exactly as the first decode steps.
    pub fn extract_timestamp(&self, token: &str) -> Result<u64, FernetError> {
        let raw = decode_raw(token)?;
        Ok(SignedToken::verify(&self.key, &raw)?.timestamp)
    }
}

fn decode_raw(token: &str) -> Result<Vec<u8>, FernetError> {
    let raw = base64url::decode(token).map_err(|_| FernetError::MalformedToken {
        reason: "not valid base64url",
    })?;
    if raw.len() < MIN_TOKEN_LEN {
        return Err(FernetError::MalformedToken {
            reason: "token too short",
        });
    }
    Ok(raw)
}

/// A decoded token whose HMAC has been checked.
#[derive(Debug)]
struct SignedToken<'a> {
    timestamp: u64,
    iv: [u8; IV_LEN],
    ciphertext: &'a [u8],
}

impl<'a> SignedToken<'a> {
    /// `raw` must be at least [`MIN_TOKEN_LEN`] bytes.
    fn verify(key: &FernetKey, raw: &'a [u8]) -> Result<Self, FernetError> {
        let (signing_base, tag) = raw.split_at(raw.len() - HMAC_LEN);

        hmac_sha256_verify(key.signing_key(), signing_base, tag)
            .map_err(|_| FernetError::InvalidSignature)?;

        let version = signing_base[0];
        if version != VERSION {
            return Err(FernetError::UnsupportedVersion(version));
        }

        let mut timestamp = [0u8; TIMESTAMP_LEN];
        timestamp.copy_from_slice(&signing_base[TIMESTAMP_OFFSET..IV_OFFSET]);
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&signing_base[IV_OFFSET..CIPHERTEXT_OFFSET]);

        Ok(Self {
            timestamp: u64::from_be_bytes(timestamp),
            iv,
            ciphertext: &signing_base[CIPHERTEXT_OFFSET..],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::raw_token_len;
    use crate::provider::{FixedClock, FixedIv};
    use fernet_crypto::aes_cbc::aes128_cbc_encrypt_blocks;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    // 1985-10-26T08:20:00Z
    const T: u64 = 499_162_800;
    const IV: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

    fn test_key() -> FernetKey {
        let raw: Vec<u8> = (0u8..32).collect();
        FernetKey::from_bytes(&raw).unwrap()
    }

    fn fixed(now: u64) -> Fernet<FixedClock, FixedIv> {
        Fernet::with_providers(test_key(), FixedClock(now), FixedIv(IV))
    }

    /// Assemble and sign a token from arbitrary fields, bypassing the
    /// encoder's padding so malformed payloads can be produced.
    fn forge(
        key: &FernetKey,
        version: u8,
        timestamp: u64,
        iv: &[u8; 16],
        ciphertext: &[u8],
    ) -> String {
        let mut raw = vec![version];
        raw.extend_from_slice(&timestamp.to_be_bytes());
        raw.extend_from_slice(iv);
        raw.extend_from_slice(ciphertext);
        let tag = hmac_sha256(key.signing_key(), &raw);
        raw.extend_from_slice(&tag);
        base64url::encode(&raw)
    }

    fn raw_of(token: &str) -> Vec<u8> {
        base64url::decode(token).unwrap()
    }

    fn hex_bytes(s: &str) -> Vec<u8> {
        hex::decode(s).expect("invalid hex")
    }

    // ================================================================== //
    // Conformance vectors
    // ================================================================== //

    #[test]
    fn test_generate_vectors() {
        let vectors = fernet_test_vectors::token::load();

        for v in &vectors.generate {
            let key = FernetKey::from_base64(&v.secret).expect("vector secret must parse");
            let iv: [u8; 16] = v.iv.as_slice().try_into().expect("iv must be 16 bytes");
            let fernet = Fernet::with_providers(key, FixedClock(v.now), FixedIv(iv));

            let token = fernet.encode(&hex_bytes(&v.src));
            assert_eq!(token, v.token, "generate mismatch for: {}", v.description);
        }
    }

    #[test]
    fn test_verify_vectors() {
        let vectors = fernet_test_vectors::token::load();

        for v in &vectors.verify {
            let key = FernetKey::from_base64(&v.secret).expect("vector secret must parse");
            let fernet = Fernet::with_providers(key, FixedClock(v.now), OsRngIv);

            let plaintext = fernet
                .decode(&v.token, v.ttl_sec)
                .unwrap_or_else(|e| panic!("verify failed for {}: {e}", v.description));
            assert_eq!(
                plaintext,
                hex_bytes(&v.src),
                "verify mismatch for: {}",
                v.description
            );
        }
    }

    #[test]
    fn test_invalid_vectors() {
        let vectors = fernet_test_vectors::token::load();

        for v in &vectors.invalid {
            let key = FernetKey::from_base64(&v.secret).expect("vector secret must parse");
            let fernet = Fernet::from_key(key);

            let err = fernet
                .decode_at_time(&v.token, v.ttl_sec, v.now)
                .expect_err(&v.description);
            assert_eq!(
                err.kind(),
                v.error,
                "wrong rejection for {}: {err}",
                v.description
            );
        }
    }

    #[test]
    fn test_generate_vectors_decode_back() {
        let vectors = fernet_test_vectors::token::load();

        for v in &vectors.generate {
            let fernet = Fernet::new(&v.secret).unwrap();
            let plaintext = fernet.decode_at_time(&v.token, None, v.now).unwrap();
            assert_eq!(plaintext, hex_bytes(&v.src), "{}", v.description);
            assert_eq!(fernet.extract_timestamp(&v.token).unwrap(), v.now);
        }
    }

    // ================================================================== //
    // Encode
    // ================================================================== //

    #[test]
    fn encode_layout() {
        let fernet = fixed(T);
        let raw = raw_of(&fernet.encode(b"hello"));

        assert_eq!(raw.len(), raw_token_len(5));
        assert_eq!(raw[0], VERSION);
        assert_eq!(&raw[1..9], &T.to_be_bytes());
        assert_eq!(&raw[9..25], &IV);
        assert_eq!((raw.len() - CIPHERTEXT_OFFSET - HMAC_LEN) % BLOCK_LEN, 0);

        let (base, tag) = raw.split_at(raw.len() - HMAC_LEN);
        assert_eq!(tag, hmac_sha256(fernet.key().signing_key(), base));
    }

    #[test]
    fn encode_is_deterministic_under_fixed_providers() {
        let fernet = fixed(T);
        assert_eq!(fernet.encode(b"same"), fernet.encode(b"same"));
        assert_eq!(
            fernet.encode(b"same"),
            fernet.encode_at_time_with_iv(b"same", T, &IV)
        );
    }

    #[test]
    fn encode_output_is_unpadded_url_safe() {
        let fernet = Fernet::from_key(test_key());
        for len in 0..40 {
            let token = fernet.encode(&vec![0xFF; len]);
            assert!(
                token
                    .bytes()
                    .all(|c| c.is_ascii_alphanumeric() || c == b'-' || c == b'_'),
                "token for length {len} has non url-safe characters: {token}"
            );
        }
    }

    #[test]
    fn random_ivs_give_distinct_tokens() {
        let fernet = Fernet::from_key(test_key());
        assert_ne!(fernet.encode(b"payload"), fernet.encode(b"payload"));
    }

    // ================================================================== //
    // Round trips
    // ================================================================== //

    #[test]
    fn roundtrip_padding_boundaries() {
        let fernet = Fernet::from_key(test_key());
        for len in [0usize, 15, 16, 17, 4096] {
            let message: Vec<u8> = (0..len).map(|i| (i * 31 % 251) as u8).collect();
            let token = fernet.encode(&message);
            assert_eq!(raw_of(&token).len(), raw_token_len(len));
            assert_eq!(fernet.decode(&token, None).unwrap(), message, "length {len}");
        }
    }

    #[test]
    fn roundtrip_with_generated_key() {
        let fernet = Fernet::new(&Fernet::generate_key()).unwrap();
        let token = fernet.encode(b"abc");
        assert_eq!(fernet.decode(&token, Some(60)).unwrap(), b"abc");
    }

    #[test]
    fn decode_accepts_padded_token_text() {
        let fernet = fixed(T);
        let token = fernet.encode(b"hello");
        let padded = format!("{token}{}", "=".repeat((4 - token.len() % 4) % 4));
        assert_eq!(fernet.decode(&padded, None).unwrap(), b"hello");
    }

    // ================================================================== //
    // Expiry
    // ================================================================== //

    #[test]
    fn expiry_boundary_is_inclusive() {
        let token = fixed(T).encode(b"hello");
        let fernet = fixed(T);

        assert!(fernet.decode_at_time(&token, Some(60), T + 59).is_ok());
        assert!(fernet.decode_at_time(&token, Some(60), T + 60).is_ok());
        assert_eq!(
            fernet.decode_at_time(&token, Some(60), T + 61),
            Err(FernetError::ExpiredToken {
                timestamp: T,
                ttl: 60,
                now: T + 61
            })
        );
    }

    #[test]
    fn no_ttl_never_expires() {
        let token = fixed(T).encode(b"old");
        assert_eq!(fixed(u64::MAX).decode(&token, None).unwrap(), b"old");
    }

    #[test]
    fn injected_clock_drives_expiry() {
        let now = Arc::new(AtomicU64::new(T));
        let handle = Arc::clone(&now);
        let fernet = Fernet::with_providers(
            test_key(),
            move || handle.load(Ordering::SeqCst),
            FixedIv(IV),
        );

        let token = fernet.encode(b"session");
        assert!(fernet.decode(&token, Some(30)).is_ok());

        now.store(T + 31, Ordering::SeqCst);
        assert!(matches!(
            fernet.decode(&token, Some(30)),
            Err(FernetError::ExpiredToken { .. })
        ));
        assert!(fernet.decode(&token, None).is_ok());
    }

    #[test]
    fn token_issued_after_now_decodes_within_ttl() {
        let fernet = fixed(T);
        let ahead = fernet.encode_at_time_with_iv(b"hi", T + 100, &IV);

        assert_eq!(
            fernet.decode_at_time(&ahead, Some(3600), T).unwrap(),
            b"hi"
        );
        assert_eq!(fernet.decode_at_time(&ahead, Some(0), T).unwrap(), b"hi");

        let far_ahead = fernet.encode_at_time_with_iv(b"hi", u64::MAX, &IV);
        assert_eq!(
            fernet.decode_at_time(&far_ahead, Some(60), T).unwrap(),
            b"hi"
        );

        // Expiry still applies once the window has passed.
        assert!(matches!(
            fernet.decode_at_time(&ahead, Some(3600), T + 100 + 3601),
            Err(FernetError::ExpiredToken { .. })
        ));
    }

    #[test]
    fn ttl_addition_saturates() {
        let fernet = fixed(T);
        let token = fernet.encode_at_time_with_iv(b"x", u64::MAX - 1, &IV);
        assert!(fernet
            .decode_at_time(&token, Some(u64::MAX), u64::MAX)
            .is_ok());
    }

    // ================================================================== //
    // Rejections
    // ================================================================== //

    #[test]
    fn every_raw_bit_flip_is_a_signature_failure() {
        let fernet = fixed(T);
        let raw = raw_of(&fernet.encode(b"tamper"));

        for byte in 0..raw.len() {
            for bit in 0..8 {
                let mut tampered = raw.clone();
                tampered[byte] ^= 1 << bit;
                assert_eq!(
                    fernet.decode(&base64url::encode(&tampered), None),
                    Err(FernetError::InvalidSignature),
                    "flip of bit {bit} in byte {byte} was not detected"
                );
            }
        }
    }

    #[test]
    fn text_level_tampering_never_succeeds() {
        let fernet = fixed(T);
        let token = fernet.encode(b"tamper");
        let alphabet = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

        for pos in 0..token.len() {
            for &c in alphabet.iter().chain(b"=+/.") {
                if token.as_bytes()[pos] == c {
                    continue;
                }
                let mut tampered = token.clone().into_bytes();
                tampered[pos] = c;
                let tampered = String::from_utf8(tampered).unwrap();
                let err = fernet.decode(&tampered, None).unwrap_err();
                assert!(
                    matches!(
                        err,
                        FernetError::InvalidSignature | FernetError::MalformedToken { .. }
                    ),
                    "replacing position {pos} with {:?} gave {err:?}",
                    c as char
                );
            }
        }
    }

    #[test]
    fn truncated_and_extended_tokens_are_rejected() {
        let fernet = fixed(T);
        let raw = raw_of(&fernet.encode(b"hello"));

        assert!(fernet.decode(&base64url::encode(&raw[..raw.len() - 1]), None).is_err());
        let mut extended = raw.clone();
        extended.push(0);
        assert_eq!(
            fernet.decode(&base64url::encode(&extended), None),
            Err(FernetError::InvalidSignature)
        );
    }

    #[test]
    fn short_tokens_are_malformed() {
        let fernet = fixed(T);
        for len in [0usize, 1, 25, 56] {
            assert_eq!(
                fernet.decode(&base64url::encode(&vec![0x80; len]), None),
                Err(FernetError::MalformedToken {
                    reason: "token too short"
                }),
                "length {len}"
            );
        }
    }

    #[test]
    fn invalid_base64_is_malformed() {
        let fernet = fixed(T);
        for text in ["%%%%", "A", "gAAAA AAA", "+/+/"] {
            assert_eq!(
                fernet.decode(text, None),
                Err(FernetError::MalformedToken {
                    reason: "not valid base64url"
                }),
                "{text:?}"
            );
        }
    }

    #[test]
    fn wrong_key_is_a_signature_failure() {
        let token = fixed(T).encode(b"secret");
        let other = Fernet::from_key(FernetKey::from_bytes(&[0x55; 32]).unwrap());
        assert_eq!(other.decode(&token, None), Err(FernetError::InvalidSignature));
    }

    #[test]
    fn same_signing_key_different_encryption_key_fails_padding_or_decrypts_garbage() {
        let mut raw: Vec<u8> = (0u8..32).collect();
        raw[31] ^= 0xFF;
        let other = Fernet::with_providers(
            FernetKey::from_bytes(&raw).unwrap(),
            FixedClock(T),
            FixedIv(IV),
        );
        let token = fixed(T).encode(b"hello");
        // The signature is valid, so any failure must come from the payload.
        match other.decode(&token, None) {
            Ok(plaintext) => assert_ne!(plaintext, b"hello"),
            Err(err) => assert_eq!(err.kind(), "malformed_token"),
        }
    }

    #[test]
    fn unsupported_version_after_valid_signature() {
        let key = test_key();
        let ct = aes128_cbc_encrypt(key.encryption_key(), &IV, b"hello");
        let token = forge(&key, 0x81, T, &IV, &ct);
        assert_eq!(
            fixed(T).decode(&token, None),
            Err(FernetError::UnsupportedVersion(0x81))
        );
        assert_eq!(
            fixed(T).extract_timestamp(&token),
            Err(FernetError::UnsupportedVersion(0x81))
        );
    }

    #[test]
    fn signature_is_checked_before_version_and_expiry() {
        let fernet = fixed(T);
        let mut raw = raw_of(&fernet.encode(b"hello"));
        raw[0] = 0x81;
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        assert_eq!(
            fernet.decode_at_time(&base64url::encode(&raw), Some(1), T + 1_000_000),
            Err(FernetError::InvalidSignature)
        );
    }

    #[test]
    fn expiry_is_checked_before_ciphertext() {
        let key = test_key();
        let token = forge(&key, VERSION, T, &IV, &[0u8; 5]);
        assert!(matches!(
            fixed(T + 100).decode(&token, Some(10)),
            Err(FernetError::ExpiredToken { .. })
        ));
        assert!(matches!(
            fixed(T + 100).decode(&token, None),
            Err(FernetError::MalformedToken { .. })
        ));
    }

    #[test]
    fn empty_and_misaligned_ciphertext_are_malformed() {
        let key = test_key();
        for ct in [vec![], vec![0u8; 5], vec![0u8; 17], vec![0u8; 31]] {
            let token = forge(&key, VERSION, T, &IV, &ct);
            assert_eq!(
                fixed(T).decode(&token, None),
                Err(FernetError::MalformedToken {
                    reason: "ciphertext is not a positive multiple of the block size"
                }),
                "ciphertext length {}",
                ct.len()
            );
        }
    }

    #[test]
    fn bad_padding_is_malformed() {
        let key = test_key();
        let mut inconsistent = b"hello".to_vec();
        inconsistent.extend_from_slice(&[0u8; 10]);
        inconsistent.push(11);

        let plaintexts: Vec<Vec<u8>> = vec![
            // pad byte 0
            [b"hello".as_slice(), [0u8; 11].as_slice()].concat(),
            // pad byte 11 but the run is not all 11s
            inconsistent,
            // pad byte 17 is larger than a block even though the run is consistent
            vec![0x11; 32],
        ];
        for blocks in plaintexts {
            let ct = aes128_cbc_encrypt_blocks(key.encryption_key(), &IV, &blocks).unwrap();
            let token = forge(&key, VERSION, T, &IV, &ct);
            assert_eq!(
                fixed(T).decode(&token, None),
                Err(FernetError::MalformedToken {
                    reason: "invalid padding"
                })
            );
        }
    }

    #[test]
    fn extract_timestamp_verifies_signature() {
        let fernet = fixed(T);
        let token = fernet.encode(b"hello");
        assert_eq!(fernet.extract_timestamp(&token), Ok(T));

        let mut raw = raw_of(&token);
        raw[3] ^= 0x10;
        assert_eq!(
            fernet.extract_timestamp(&base64url::encode(&raw)),
            Err(FernetError::InvalidSignature)
        );
    }

    #[test]
    fn codec_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Fernet>();

        let fernet = Arc::new(Fernet::from_key(test_key()));
        let handles: Vec<_> = (0..4u8)
            .map(|i| {
                let fernet = Arc::clone(&fernet);
                std::thread::spawn(move || {
                    let message = vec![i; 100 + i as usize];
                    let token = fernet.encode(&message);
                    assert_eq!(fernet.decode(&token, Some(60)).unwrap(), message);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
