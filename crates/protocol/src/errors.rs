//! Error and retry-advice types shared by the codec and the executor port.
//!
//! [`FramingError`] and [`CodecError`] describe failures turning bytes back
//! into a message. [`TransportError`] describes failures of the network
//! exchange itself and is what every [`crate::RequestExecutor`] returns.
//!
//! [`RetryPolicy`] is advisory only: nothing in this workspace retries. Callers
//! that own a retry loop use it to decide whether to re-issue a call.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed error used as the `source` of transport failures, so executors can
/// surface their underlying HTTP stack errors without this crate naming them.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// ## Rules
///
/// - `Retryable`: deadline exceeded, connection failures, HTTP 429 and 5xx.
/// - `NonRetryable`: caller cancellation, HTTP 4xx other than 429, malformed
///   requests, undecodable responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means retry
        /// immediately or apply the caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried without caller intervention.
    NonRetryable,
}

impl RetryPolicy {
    /// Returns `true` for [`RetryPolicy::Retryable`].
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable { .. })
    }
}

// ---------------------------------------------------------------------------
// Codec errors
// ---------------------------------------------------------------------------

/// The varint size prefix of an envelope is absent or unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FramingError {
    /// The buffer holds no bytes at all, so there is no size prefix to read.
    #[error("failed to read message size varint: buffer is empty")]
    Empty,

    /// The size prefix is truncated or longer than a 64-bit varint allows.
    #[error("failed to read message size varint: {reason}")]
    MalformedPrefix {
        /// Description reported by the varint decoder.
        reason: String,
    },

    /// The size prefix decoded, but the length does not fit in `usize`.
    #[error("message size {declared} exceeds the addressable buffer size")]
    LengthOverflow {
        /// Length as declared on the wire.
        declared: u64,
    },

    /// Strict framing only: the declared payload length disagrees with the
    /// number of bytes actually available after the prefix.
    #[error("message size varint declares {declared} bytes but {available} bytes follow")]
    LengthMismatch {
        /// Length as declared on the wire.
        declared: usize,
        /// Bytes present after the prefix.
        available: usize,
    },
}

/// Failure decoding an envelope into a structured message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// The size prefix could not be read.
    #[error(transparent)]
    Framing(#[from] FramingError),

    /// The payload after the size prefix is not a structurally valid message.
    #[error("failed to unmarshal message payload: {0}")]
    Payload(#[from] prost::DecodeError),

    /// Structural decode succeeded but the secondary required-field check
    /// found fields the schema marks as required.
    #[error("failed to verify all fields are initialized: missing {}", missing.join(", "))]
    IncompleteMessage {
        /// Dotted paths of the missing fields, e.g. `sentence[0].tokenOffsetEnd`.
        missing: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failure of the network exchange or of reading the response body.
///
/// Cancellation and deadline expiry signalled through the call's
/// [`crate::CallContext`] are reported here as well.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The call's cancellation token fired before the exchange completed.
    #[error("request was cancelled")]
    Cancelled,

    /// The call's deadline passed before the exchange completed.
    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// The request could not be sent or no response was received.
    #[error("failed to execute request: {source}")]
    Send {
        /// Underlying HTTP stack error.
        #[source]
        source: BoxError,
    },

    /// The response arrived but its body could not be read in full.
    #[error("failed to read response body: {source}")]
    BodyRead {
        /// Underlying HTTP stack error.
        #[source]
        source: BoxError,
    },
}

impl TransportError {
    /// Wraps an HTTP stack error raised while sending.
    pub fn send(source: impl Into<BoxError>) -> Self {
        Self::Send {
            source: source.into(),
        }
    }

    /// Wraps an HTTP stack error raised while reading the body.
    pub fn body_read(source: impl Into<BoxError>) -> Self {
        Self::BodyRead {
            source: source.into(),
        }
    }

    /// Retry advice for this failure.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Cancelled => RetryPolicy::NonRetryable,
            Self::DeadlineExceeded | Self::Send { .. } | Self::BodyRead { .. } => {
                RetryPolicy::Retryable { after: None }
            }
        }
    }
}
