//! Test vector loading for the Fernet workspace.
//!
//! This crate provides serde-deserializable structs for the JSON files under
//! `.test-vectors/` at the repository root.
//!
//! Each module corresponds to a single JSON file and provides:
//! - Typed structs matching the JSON schema
//! - A `load()` function that deserializes the embedded JSON via `include_str!`
//!
//! # Usage
//!
//! ```rust
//! let vectors = fernet_test_vectors::token::load();
//! for v in &vectors.generate {
//!     assert_eq!(v.iv.len(), 16);
//! }
//! ```

pub mod primitives;
pub mod token;

pub use primitives::PrimitiveVectors;
pub use token::TokenVectors;
