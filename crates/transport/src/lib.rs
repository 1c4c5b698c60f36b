//! HTTP infrastructure adapter for the CoreNLP client.
//!
//! Implements the [`protocol::RequestExecutor`] port over `reqwest`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Connection handling, TLS, client-wide timeouts and the
//! enforcement of each call's cancellation token and deadline all live here.
//! The `client` crate sees only [`protocol::RequestExecutor`].
//!
//! ## Cancellation
//!
//! Both the wait for the response head and the body read race against the
//! call's [`protocol::CallContext`]. Whichever fires first wins; the
//! in-flight reqwest future is dropped, which aborts the request.

pub mod config;
pub mod errors;
pub mod executor;

pub use config::HttpExecutorConfig;
pub use errors::ExecutorBuildError;
pub use executor::ReqwestExecutor;
