//! Structured payloads on top of the raw token codec.
//!
//! A [`PayloadFernet`] borrows a [`Fernet`] and runs a [`PayloadCodec`]
//! between the caller's value and the token bytes. Token-level checks
//! always run first, so a tampered or expired token is reported as such
//! and never reaches the deserializer.

use rmpv::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::FernetError;
use crate::provider::{Clock, IvSource, OsRngIv, SystemClock};
use crate::token::Fernet;

/// Converts structured values to and from token plaintext.
pub trait PayloadCodec {
    type Value;

    /// # Errors
    ///
    /// [`FernetError::InvalidArgument`] if `value` cannot be represented.
    fn serialize(&self, value: &Self::Value) -> Result<Vec<u8>, FernetError>;

    /// # Errors
    ///
    /// [`FernetError::Serialization`] if `bytes` is not one complete value.
    fn deserialize(&self, bytes: &[u8]) -> Result<Self::Value, FernetError>;
}

/// MessagePack payloads via `rmpv`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Msgpack;

impl PayloadCodec for Msgpack {
    type Value = Value;

    fn serialize(&self, value: &Value) -> Result<Vec<u8>, FernetError> {
        let mut buf = Vec::new();
        rmpv::encode::write_value(&mut buf, value)
            .map_err(|e| FernetError::InvalidArgument(format!("msgpack encode: {e}")))?;
        Ok(buf)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value, FernetError> {
        let mut rest = bytes;
        let value = rmpv::decode::read_value(&mut rest)
            .map_err(|e| FernetError::Serialization(format!("msgpack decode: {e}")))?;
        if !rest.is_empty() {
            return Err(FernetError::Serialization(format!(
                "{} trailing bytes after msgpack value",
                rest.len()
            )));
        }
        Ok(value)
    }
}

/// A token codec whose messages are structured values instead of bytes.
pub struct PayloadFernet<'a, P = Msgpack, C = SystemClock, R = OsRngIv> {
    fernet: &'a Fernet<C, R>,
    codec: P,
}

impl<'a, P: PayloadCodec, C: Clock, R: IvSource> PayloadFernet<'a, P, C, R> {
    /// Wrap `fernet`, converting payloads with `codec`.
    pub fn new(fernet: &'a Fernet<C, R>, codec: P) -> Self {
        Self { fernet, codec }
    }

    /// Serialize `value` and wrap it in a token.
    ///
    /// # Errors
    ///
    /// [`FernetError::InvalidArgument`] if the codec cannot represent `value`.
    pub fn encode(&self, value: &P::Value) -> Result<String, FernetError> {
        let bytes = self.codec.serialize(value)?;
        Ok(self.fernet.encode(&bytes))
    }

    /// Verify `token` and deserialize its payload.
    ///
    /// # Errors
    ///
    /// Any token-level error from [`Fernet::decode`], then
    /// [`FernetError::Serialization`] for a corrupt payload.
    pub fn decode(&self, token: &str, ttl: Option<u64>) -> Result<P::Value, FernetError> {
        let bytes = self.fernet.decode(token, ttl)?;
        self.codec.deserialize(&bytes)
    }

    /// # Errors
    ///
    /// Same as [`decode`](Self::decode).
    pub fn decode_at_time(
        &self,
        token: &str,
        ttl: Option<u64>,
        now: u64,
    ) -> Result<P::Value, FernetError> {
        let bytes = self.fernet.decode_at_time(token, ttl, now)?;
        self.codec.deserialize(&bytes)
    }
}

impl<'a, C: Clock, R: IvSource> PayloadFernet<'a, Msgpack, C, R> {
    /// Encode any `serde` value through the MessagePack value model.
    ///
    /// # Errors
    ///
    /// [`FernetError::InvalidArgument`] if `value` fails to serialize.
    pub fn encode_serde<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, FernetError> {
        let value = rmpv::ext::to_value(value)
            .map_err(|e| FernetError::InvalidArgument(format!("serialize: {e}")))?;
        self.encode(&value)
    }

    /// Decode a token into any `serde` type.
    ///
    /// # Errors
    ///
    /// Token-level errors first, then [`FernetError::Serialization`] if the
    /// payload does not match `T`.
    pub fn decode_serde<T: DeserializeOwned>(
        &self,
        token: &str,
        ttl: Option<u64>,
    ) -> Result<T, FernetError> {
        let value = self.decode(token, ttl)?;
        rmpv::ext::from_value(value).map_err(|e| FernetError::Serialization(e.to_string()))
    }
}

impl<C: Clock, R: IvSource> Fernet<C, R> {
    /// Borrow this codec as a MessagePack payload codec.
    #[must_use]
    pub fn msgpack(&self) -> PayloadFernet<'_, Msgpack, C, R> {
        PayloadFernet::new(self, Msgpack)
    }
}
