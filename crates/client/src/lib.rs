//! CoreNLP annotation client.
//!
//! [`AnnotationClient`] submits text to a CoreNLP server and returns the
//! annotated [`protocol::Document`]. Each call builds one request (text as a
//! length-delimited protobuf body, configuration as the `properties` query
//! parameter), runs it through the injected [`protocol::RequestExecutor`], and
//! decodes the response body with the same framing.
//!
//! ## Architectural Layer
//!
//! **Orchestration.** This crate sequences the codec and request properties
//! from [`protocol`] around a single executor call. It has no networking
//! dependency; the `transport` crate supplies a production executor.
//!
//! ## Example
//!
//! ```no_run
//! # async fn run(executor: impl protocol::RequestExecutor) -> Result<(), Box<dyn std::error::Error>> {
//! use client::AnnotationClient;
//! use protocol::{annotators, CallContext};
//! use std::time::Duration;
//!
//! let client = AnnotationClient::new("http://127.0.0.1:9000", executor)?;
//! let ctx = CallContext::background().with_timeout(Duration::from_secs(60));
//! let doc = client
//!     .annotate(&ctx, "the quick brown fox", &[annotators::TOKENIZE, annotators::SSPLIT])
//!     .await?;
//! println!("{} sentences", doc.sentence.len());
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod client;
pub mod config;
pub mod errors;
pub mod request;

pub use address::parse_service_address;
pub use client::AnnotationClient;
pub use config::ClientConfig;
pub use errors::{AddressError, AnnotateError, RequestError};
pub use request::build_request;
