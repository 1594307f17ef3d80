//! Typed decoders for the two plain-text responses the walk interprets.

use super::{LEVEL_PREFIX, NOT_READY_SENTINEL, SECRET_PREFIX};
use crate::error::DecodeError;

/// Decoded `/getUserSecret` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretReply {
    /// The service answered with the "not ready" sentinel.
    NotReady,
    /// The secret, prefix stripped and trimmed.
    Ready(String),
}

/// Decode a `/getUserSecret` body.
///
/// The sentinel is matched against the raw body verbatim. Any other body
/// must carry [`SECRET_PREFIX`] and a non-empty value.
pub fn decode_secret(body: &str) -> Result<SecretReply, DecodeError> {
    if body == NOT_READY_SENTINEL {
        return Ok(SecretReply::NotReady);
    }

    let value = strip(body, SECRET_PREFIX)?;
    Ok(SecretReply::Ready(value.to_string()))
}

/// Decode a `/getUserLevel` body into the integer level.
pub fn decode_level(body: &str) -> Result<i64, DecodeError> {
    let value = strip(body, LEVEL_PREFIX)?;
    value.parse().map_err(|_| DecodeError::NotAnInteger {
        value: value.to_string(),
    })
}

fn strip<'a>(body: &'a str, prefix: &'static str) -> Result<&'a str, DecodeError> {
    let value = body
        .strip_prefix(prefix)
        .ok_or_else(|| DecodeError::MissingPrefix {
            prefix,
            body: body.to_string(),
        })?
        .trim();

    if value.is_empty() {
        return Err(DecodeError::Empty {
            body: body.to_string(),
        });
    }
    Ok(value)
}
