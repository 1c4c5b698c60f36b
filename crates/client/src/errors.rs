//! Client-level error types.
//!
//! [`AddressError`] is raised once, when a client is constructed.
//! [`AnnotateError`] is the terminal result of a failed `annotate` call and
//! keeps the request-side, transport, server and response-decoding stages
//! apart so callers can branch on where the call failed.

use protocol::{CodecError, RetryPolicy, TransportError};
use thiserror::Error;

/// The configured service address is not an absolute URL with a host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The address could not be parsed at all.
    #[error("failed to parse address '{address}': {source}")]
    Invalid {
        address: String,
        #[source]
        source: url::ParseError,
    },

    /// The address parsed but has no host to send requests to
    /// (e.g. `mailto:` or `data:` URLs).
    #[error("address '{address}' is not an absolute network address")]
    NotAbsolute { address: String },
}

/// The outbound request could not be built.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to marshal request properties to JSON: {0}")]
    Properties(#[from] serde_json::Error),
}

/// Failure of an `annotate` call.
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// The request could not be built. Nothing was sent.
    #[error("failed to build request: {0}")]
    Request(#[from] RequestError),

    /// The exchange failed, was cancelled, timed out, or the response body
    /// could not be read.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered with status 400 or above. `body` is the raw
    /// response body, not parsed further.
    #[error(
        "The server failed to process the request.\nReturned HTTP status code: {status_code}\nResponse body:\n{body}"
    )]
    Server { status_code: u16, body: String },

    /// The service answered successfully but its body is not a decodable
    /// document envelope.
    #[error("failed to unmarshal response into document: {0}")]
    Decode(#[source] CodecError),
}

impl AnnotateError {
    /// HTTP status code for [`AnnotateError::Server`], `None` otherwise.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Server { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Retry advice for callers that own a retry loop.
    ///
    /// Server errors are retryable for 429 and 5xx; request-building and
    /// decode failures never are, since re-sending yields the same result.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Request(_) | Self::Decode(_) => RetryPolicy::NonRetryable,
            Self::Transport(e) => e.retry_policy(),
            Self::Server { status_code, .. } => {
                if *status_code == 429 || *status_code >= 500 {
                    RetryPolicy::Retryable { after: None }
                } else {
                    RetryPolicy::NonRetryable
                }
            }
        }
    }
}
