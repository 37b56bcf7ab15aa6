//! Fernet authenticated tokens.
//!
//! A token carries an AES-128-CBC encrypted message together with its issue
//! time, signed with HMAC-SHA256 and encoded as URL-safe Base64. Any change to
//! a token is detected before decryption, and an optional TTL bounds its age.
//!
//! ```
//! use fernet_core::Fernet;
//!
//! let fernet = Fernet::new(&fernet_core::generate_key()).unwrap();
//! let token = fernet.encode(b"hello");
//! assert_eq!(fernet.decode(&token, Some(60)).unwrap(), b"hello");
//! ```
//!
//! [`PayloadFernet`] layers MessagePack values (or any `serde` type) on top of
//! the same codec.

pub mod base64url;
pub mod constants;
pub mod error;
pub mod key;
pub mod payload;
pub mod provider;
pub mod token;

pub use error::FernetError;
pub use key::{generate_key, FernetKey};
pub use payload::{Msgpack, PayloadCodec, PayloadFernet};
pub use provider::{Clock, FixedClock, FixedIv, IvSource, OsRngIv, SystemClock};
pub use token::Fernet;
