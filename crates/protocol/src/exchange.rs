//! The executor port: one HTTP request/response exchange.
//!
//! A client never talks to a network stack directly. It builds a fully formed
//! [`ExchangeRequest`] and hands it to a [`RequestExecutor`] together with the
//! caller's [`CallContext`]. The executor is the only component that blocks on
//! I/O and the only one responsible for honoring the context's cancellation
//! token and deadline, both while waiting for the response head and while
//! reading the body.
//!
//! Timeouts, retries and instrumentation beyond that belong to executor
//! implementations (or wrappers around them), not to the client.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::errors::TransportError;

// ---------------------------------------------------------------------------
// Call context
// ---------------------------------------------------------------------------

/// Cancellation and deadline signals for one or more calls.
///
/// Cloning shares the cancellation token: cancelling any clone cancels all of
/// them. Independent calls that must be cancellable independently need
/// independent contexts (see [`CallContext::child`]).
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns a copy of this context whose deadline is `timeout` from now,
    /// or the existing deadline if that is earlier.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.with_deadline(deadline)
    }

    /// Returns a copy of this context with the given deadline, or the
    /// existing deadline if that is earlier.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Returns a copy of this context observing `token` instead of its own.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// A context cancelled whenever this one is, but which can also be
    /// cancelled on its own without affecting this one.
    pub fn child(&self) -> Self {
        Self {
            cancellation: self.cancellation.child_token(),
            deadline: self.deadline,
        }
    }

    /// The token executors wait on.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Cancels every call observing this context.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline; `Some(Duration::ZERO)` once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// A fully formed outbound HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRequest {
    /// HTTP method, upper case.
    pub method: String,
    /// Absolute target URL, query string included.
    pub url: Url,
    /// Header name/value pairs in insertion order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ExchangeRequest {
    /// Looks up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Looks up a decoded query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

/// Readable body of an [`ExchangeResponse`].
///
/// Reading consumes the body. Implementations backed by a live connection must
/// observe the call's [`CallContext`] while reading.
#[async_trait]
pub trait ResponseBody: Send {
    /// Reads the whole body into memory.
    async fn read_to_end(self: Box<Self>) -> Result<Vec<u8>, TransportError>;
}

#[async_trait]
impl ResponseBody for Vec<u8> {
    async fn read_to_end(self: Box<Self>) -> Result<Vec<u8>, TransportError> {
        Ok(*self)
    }
}

/// The response head plus an unread body.
pub struct ExchangeResponse {
    pub status: u16,
    /// Header name/value pairs as received.
    pub headers: Vec<(String, String)>,
    pub body: Box<dyn ResponseBody>,
}

impl ExchangeResponse {
    /// Creates a response with no headers.
    pub fn new(status: u16, body: impl ResponseBody + 'static) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Box::new(body),
        }
    }

    /// Creates a response whose body is already in memory.
    pub fn from_bytes(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, body.into())
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns `true` for status codes of 400 and above.
    pub fn is_failure(&self) -> bool {
        self.status >= 400
    }
}

impl std::fmt::Debug for ExchangeResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Executor port
// ---------------------------------------------------------------------------

/// Performs a single request/response exchange.
///
/// Implementations must be safe to share between concurrent calls; a client
/// holds one executor and issues every call through it.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Sends `request` and returns the response head with an unread body.
    ///
    /// Returns [`TransportError::Cancelled`] or
    /// [`TransportError::DeadlineExceeded`] when `ctx` fires first. HTTP
    /// failure statuses are *not* errors at this layer.
    async fn execute(
        &self,
        ctx: &CallContext,
        request: ExchangeRequest,
    ) -> Result<ExchangeResponse, TransportError>;
}

#[async_trait]
impl<E: RequestExecutor + ?Sized> RequestExecutor for Arc<E> {
    async fn execute(
        &self,
        ctx: &CallContext,
        request: ExchangeRequest,
    ) -> Result<ExchangeResponse, TransportError> {
        (**self).execute(ctx, request).await
    }
}

#[async_trait]
impl<'a, E: RequestExecutor + ?Sized> RequestExecutor for &'a E {
    async fn execute(
        &self,
        ctx: &CallContext,
        request: ExchangeRequest,
    ) -> Result<ExchangeResponse, TransportError> {
        (**self).execute(ctx, request).await
    }
}
