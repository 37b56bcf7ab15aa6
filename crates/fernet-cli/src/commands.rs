//! Subcommand implementations.
//!
//! Each function takes already-read input and returns the bytes to write to
//! stdout, leaving process I/O to the binary.

use fernet_core::{Clock, Fernet, FernetError, IvSource};

use crate::error::CliError;

/// `fernet genkey`: a fresh random key followed by a newline.
pub fn genkey() -> String {
    let mut key = fernet_core::generate_key();
    key.push('\n');
    key
}

/// `fernet encode`: wrap `input` in a token.
///
/// With `msgpack`, `input` is parsed as JSON and carried as a MessagePack
/// payload instead of raw bytes.
pub fn encode<C: Clock, R: IvSource>(
    fernet: &Fernet<C, R>,
    input: &[u8],
    msgpack: bool,
) -> Result<String, CliError> {
    let mut token = if msgpack {
        let value: serde_json::Value = serde_json::from_slice(input)?;
        fernet.msgpack().encode_serde(&value)?
    } else {
        fernet.encode(input)
    };
    tracing::debug!(input_len = input.len(), msgpack, "encoded token");
    token.push('\n');
    Ok(token)
}

/// `fernet decode`: verify `token` and return its plaintext.
///
/// With `msgpack`, the payload is rendered back as a line of JSON. Any token
/// rejection is logged with its specific kind and surfaced as the generic
/// [`CliError::InvalidToken`].
pub fn decode<C: Clock, R: IvSource>(
    fernet: &Fernet<C, R>,
    token: &str,
    ttl: Option<u64>,
    msgpack: bool,
) -> Result<Vec<u8>, CliError> {
    let token = token.trim();
    let result = if msgpack {
        fernet
            .msgpack()
            .decode_serde::<serde_json::Value>(token, ttl)
            .and_then(|value| {
                let mut out = serde_json::to_vec(&value)
                    .map_err(|e| FernetError::Serialization(e.to_string()))?;
                out.push(b'\n');
                Ok(out)
            })
    } else {
        fernet.decode(token, ttl)
    };

    match result {
        Ok(plaintext) => Ok(plaintext),
        Err(err) if err.is_token_rejection() => {
            tracing::warn!(kind = err.kind(), error = %err, ttl, "token rejected");
            Err(CliError::InvalidToken)
        }
        Err(err) => Err(err.into()),
    }
}
