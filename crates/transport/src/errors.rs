//! Executor construction errors.
//!
//! Per-call failures are [`protocol::TransportError`]; this module only covers
//! building the executor itself.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutorBuildError {
    /// The configured user agent is not a valid header value.
    #[error("invalid user agent '{user_agent}'")]
    InvalidUserAgent { user_agent: String },

    /// reqwest rejected the client configuration (e.g. TLS backend failure).
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
