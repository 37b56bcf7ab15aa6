//! Test vector types for token.json
//!
//! Whole-token vectors: deterministic generation, successful verification,
//! and tokens that must be rejected with a specific error kind.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TokenConstants {
    pub version: u8,
    pub timestamp_length: u64,
    pub iv_length: u64,
    pub block_length: u64,
    pub hmac_length: u64,
}

/// A fixed (secret, time, IV, plaintext) tuple and the token it must produce.
#[derive(Debug, Deserialize)]
pub struct GenerateVector {
    pub description: String,
    pub secret: String,
    pub now: u64,
    pub now_rfc3339: String,
    pub iv: Vec<u8>,
    /// Plaintext, hex encoded.
    pub src: String,
    /// Expected token, unpadded Base64URL.
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyVector {
    pub description: String,
    pub secret: String,
    pub token: String,
    pub now: u64,
    pub ttl_sec: Option<u64>,
    /// Expected plaintext, hex encoded.
    pub src: String,
}

#[derive(Debug, Deserialize)]
pub struct InvalidVector {
    pub description: String,
    pub secret: String,
    pub token: String,
    pub now: u64,
    pub ttl_sec: Option<u64>,
    /// One of `malformed_token`, `invalid_signature`, `unsupported_version`,
    /// `expired_token`.
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenVectors {
    pub description: String,
    pub source: String,
    pub constants: TokenConstants,
    pub generate: Vec<GenerateVector>,
    pub verify: Vec<VerifyVector>,
    pub invalid: Vec<InvalidVector>,
}

pub fn load() -> TokenVectors {
    let json = include_str!("../../../.test-vectors/token.json");
    serde_json::from_str(json).expect("Failed to deserialize token.json")
}
