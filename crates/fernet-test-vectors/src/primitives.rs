//! Test vector types for primitives.json
//!
//! PKCS#7, HMAC-SHA256 and AES-128-CBC vectors. All byte fields are hex.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Pkcs7PaddingVector {
    pub description: String,
    pub input: String,
    pub input_length: u64,
    pub padded: String,
    pub padded_length: u64,
    pub pad_length: u64,
}

#[derive(Debug, Deserialize)]
pub struct HmacSha256Vector {
    pub description: String,
    pub key: String,
    pub message: String,
    pub digest: String,
}

/// Raw block-aligned AES-128-CBC vector; `plaintext` already carries padding.
#[derive(Debug, Deserialize)]
pub struct AesCbcVector {
    pub description: String,
    pub key: String,
    pub iv: String,
    pub plaintext: String,
    pub ciphertext: String,
}

#[derive(Debug, Deserialize)]
pub struct PrimitiveVectors {
    pub description: String,
    pub source: String,
    pub pkcs7_padding: Vec<Pkcs7PaddingVector>,
    pub hmac_sha256: Vec<HmacSha256Vector>,
    pub aes_128_cbc: Vec<AesCbcVector>,
}

pub fn load() -> PrimitiveVectors {
    let json = include_str!("../../../.test-vectors/primitives.json");
    serde_json::from_str(json).expect("Failed to deserialize primitives.json")
}
