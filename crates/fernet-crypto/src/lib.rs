//! Symmetric primitives underneath the Fernet token format.
//!
//! This crate wraps the RustCrypto block cipher and MAC implementations with
//! the exact shapes the token codec needs: AES-128-CBC without library-level
//! padding, PKCS#7 padding applied and checked by hand, and HMAC-SHA256 with a
//! constant-time verification path.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod aes_cbc;
pub mod error;
pub mod hmac;
pub mod pkcs7;

pub use error::CryptoError;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;
