//! Time and IV sources for the token codec.
//!
//! Production code uses [`SystemClock`] and [`OsRngIv`]. Tests inject
//! [`FixedClock`], [`FixedIv`], or any closure with the matching signature,
//! which keeps the codec a pure function of its inputs.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::Rng;

use crate::constants::IV_LEN;

/// Source of the current Unix time in seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Source of a fresh 16-byte AES-CBC initialization vector per token.
pub trait IvSource: Send + Sync {
    fn next_iv(&self) -> [u8; IV_LEN];
}

/// Wall-clock time from [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // A clock set before 1970 reads as the epoch rather than panicking.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Random IVs from the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRngIv;

impl IvSource for OsRngIv {
    fn next_iv(&self) -> [u8; IV_LEN] {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill(&mut iv);
        iv
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

/// Returns the same IV for every token. Only for deterministic tests and
/// conformance vectors: reusing an IV in production leaks plaintext equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedIv(pub [u8; IV_LEN]);

impl IvSource for FixedIv {
    fn next_iv(&self) -> [u8; IV_LEN] {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> u64 + Send + Sync,
{
    fn now(&self) -> u64 {
        self()
    }
}

impl<F> IvSource for F
where
    F: Fn() -> [u8; IV_LEN] + Send + Sync,
{
    fn next_iv(&self) -> [u8; IV_LEN] {
        self()
    }
}
