//! Length-delimited envelope codec.
//!
//! An envelope is an unsigned LEB128 varint holding the payload's byte length,
//! followed by the protobuf-encoded payload:
//!
//! ```text
//! +----------------+---------------------------+
//! | varint(len)    | payload (len bytes)       |
//! +----------------+---------------------------+
//! ```
//!
//! Request bodies and response bodies both use this framing.
//!
//! ## Declared vs. consumed length
//!
//! Under [`FramingPolicy::Lenient`] (the default) the declared length is
//! advisory: everything after the prefix is handed to the protobuf decoder,
//! which decides how many bytes form the message. This matches what the
//! service produces and accepts. [`FramingPolicy::Strict`] instead rejects any
//! envelope whose declared length differs from the bytes that follow.
//! [`Envelopes`], which walks concatenated envelopes, is always strict since
//! the next prefix starts exactly where the declared length ends.

use std::str::FromStr;

use prost::Message;
use serde::{Deserialize, Serialize};

use crate::document::RequiredFields;
use crate::errors::{CodecError, FramingError};

// ---------------------------------------------------------------------------
// Framing policy
// ---------------------------------------------------------------------------

/// How strictly the declared payload length is enforced on decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FramingPolicy {
    /// The declared length is advisory; the decoder consumes the remainder.
    #[default]
    Lenient,
    /// The declared length must equal the number of bytes after the prefix.
    Strict,
}

impl FromStr for FramingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown framing policy '{other}', expected 'lenient' or 'strict'"
            )),
        }
    }
}

impl std::fmt::Display for FramingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lenient => write!(f, "lenient"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Encodes `message` as a single envelope.
///
/// The prefix is computed from the message's own encoded length, so it always
/// equals the number of payload bytes that follow.
pub fn encode<M: Message>(message: &M) -> Vec<u8> {
    message.encode_length_delimited_to_vec()
}

// ---------------------------------------------------------------------------
// Size prefix
// ---------------------------------------------------------------------------

/// A decoded size prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthPrefix {
    /// Payload length as declared on the wire.
    pub declared: usize,
    /// Number of bytes the varint itself occupies.
    pub prefix_len: usize,
}

/// Reads the varint size prefix at the start of `buf`.
pub fn read_length_prefix(buf: &[u8]) -> Result<LengthPrefix, FramingError> {
    if buf.is_empty() {
        return Err(FramingError::Empty);
    }

    let mut cursor = buf;
    let declared = prost::encoding::decode_varint(&mut cursor).map_err(|e| {
        FramingError::MalformedPrefix {
            reason: e.to_string(),
        }
    })?;
    let prefix_len = buf.len() - cursor.len();
    let declared =
        usize::try_from(declared).map_err(|_| FramingError::LengthOverflow { declared })?;

    Ok(LengthPrefix {
        declared,
        prefix_len,
    })
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Decodes a single envelope under [`FramingPolicy::Lenient`].
pub fn decode<M>(buf: &[u8]) -> Result<M, CodecError>
where
    M: Message + Default + RequiredFields,
{
    decode_with_policy(buf, FramingPolicy::Lenient)
}

/// Decodes a single envelope.
///
/// Decoding is permissive about completeness: a structurally valid payload is
/// returned even if fields are absent. Only when the message's fast
/// [`RequiredFields::is_initialized`] check fails does the secondary
/// [`RequiredFields::missing_required_fields`] check run, and only a non-empty
/// result from it produces [`CodecError::IncompleteMessage`].
pub fn decode_with_policy<M>(buf: &[u8], policy: FramingPolicy) -> Result<M, CodecError>
where
    M: Message + Default + RequiredFields,
{
    let prefix = read_length_prefix(buf)?;
    let payload = &buf[prefix.prefix_len..];

    if policy == FramingPolicy::Strict && payload.len() != prefix.declared {
        return Err(FramingError::LengthMismatch {
            declared: prefix.declared,
            available: payload.len(),
        }
        .into());
    }

    check_initialized(M::decode(payload)?)
}

fn check_initialized<M: RequiredFields>(message: M) -> Result<M, CodecError> {
    if message.is_initialized() {
        return Ok(message);
    }

    let missing = message.missing_required_fields();
    if missing.is_empty() {
        return Ok(message);
    }

    tracing::debug!(
        missing = missing.len(),
        "decoded message is missing required fields"
    );
    Err(CodecError::IncompleteMessage { missing })
}

// ---------------------------------------------------------------------------
// Concatenated envelopes
// ---------------------------------------------------------------------------

/// Iterator over the payloads of back-to-back envelopes in one buffer.
///
/// Each item is the payload slice of one envelope. Declared lengths are
/// enforced: a prefix declaring more bytes than remain yields
/// [`FramingError::LengthMismatch`] and ends iteration.
#[derive(Debug, Clone)]
pub struct Envelopes<'a> {
    rest: &'a [u8],
    failed: bool,
}

impl<'a> Envelopes<'a> {
    /// Creates an iterator over the envelopes in `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            rest: buf,
            failed: false,
        }
    }

    /// Decodes every envelope in the buffer into `M`.
    pub fn decode_all<M>(self) -> Result<Vec<M>, CodecError>
    where
        M: Message + Default + RequiredFields,
    {
        self.map(|payload| -> Result<M, CodecError> {
            check_initialized(M::decode(payload?)?)
        })
        .collect()
    }
}

impl<'a> Iterator for Envelopes<'a> {
    type Item = Result<&'a [u8], FramingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }

        let prefix = match read_length_prefix(self.rest) {
            Ok(prefix) => prefix,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };

        let body = &self.rest[prefix.prefix_len..];
        if body.len() < prefix.declared {
            self.failed = true;
            return Some(Err(FramingError::LengthMismatch {
                declared: prefix.declared,
                available: body.len(),
            }));
        }

        let (payload, rest) = body.split_at(prefix.declared);
        self.rest = rest;
        Some(Ok(payload))
    }
}
