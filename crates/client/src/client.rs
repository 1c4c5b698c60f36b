//! The annotate call.

use protocol::{codec, CallContext, Document, FramingPolicy, RequestExecutor, RequestId};
use tracing::Instrument;
use url::Url;

use crate::address::parse_service_address;
use crate::config::ClientConfig;
use crate::errors::{AddressError, AnnotateError};
use crate::request::build_request;

/// Client for a single CoreNLP server.
///
/// The address is validated once at construction and never changes, so one
/// client can serve concurrent `annotate` calls as long as its executor can.
/// Every call allocates its own request and response buffers.
#[derive(Debug, Clone)]
pub struct AnnotationClient<E> {
    address: Url,
    executor: E,
    framing: FramingPolicy,
}

impl<E: RequestExecutor> AnnotationClient<E> {
    /// Creates a client for `address` using lenient response framing.
    pub fn new(address: &str, executor: E) -> Result<Self, AddressError> {
        Ok(Self {
            address: parse_service_address(address)?,
            executor,
            framing: FramingPolicy::default(),
        })
    }

    /// Creates a client from loaded configuration.
    pub fn from_config(config: &ClientConfig, executor: E) -> Result<Self, AddressError> {
        Ok(Self::new(&config.address, executor)?.with_framing(config.framing))
    }

    /// Sets how strictly response size prefixes are enforced.
    pub fn with_framing(mut self, framing: FramingPolicy) -> Self {
        self.framing = framing;
        self
    }

    /// The normalized service address.
    pub fn address(&self) -> &Url {
        &self.address
    }

    pub fn framing(&self) -> FramingPolicy {
        self.framing
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Annotates `text` with the given annotators, in order.
    ///
    /// Performs exactly one exchange through the executor and reads the
    /// response body in full before returning. Cancellation and deadlines on
    /// `ctx` are enforced by the executor and surface as
    /// [`AnnotateError::Transport`]. A status of 400 or above yields
    /// [`AnnotateError::Server`] with the body verbatim; otherwise the body is
    /// decoded as a document envelope.
    pub async fn annotate<S>(
        &self,
        ctx: &CallContext,
        text: &str,
        annotators: &[S],
    ) -> Result<Document, AnnotateError>
    where
        S: AsRef<str> + Sync,
    {
        let request_id = RequestId::new_random();
        let span = tracing::debug_span!(
            "annotate",
            %request_id,
            annotators = annotators.len(),
            text_bytes = text.len()
        );

        async move {
            let request = build_request(&self.address, text, annotators)?;
            tracing::debug!(url = %request.url, body_bytes = request.body.len(), "sending request");

            let response = self.executor.execute(ctx, request).await?;
            let status = response.status;
            let failed = response.is_failure();
            let body = response.body.read_to_end().await?;

            if failed {
                let body = String::from_utf8_lossy(&body).into_owned();
                tracing::warn!(status, body_bytes = body.len(), "server rejected request");
                return Err(AnnotateError::Server {
                    status_code: status,
                    body,
                });
            }

            let doc: Document =
                codec::decode_with_policy(&body, self.framing).map_err(AnnotateError::Decode)?;
            tracing::debug!(status, sentences = doc.sentence.len(), "decoded document");
            Ok(doc)
        }
        .instrument(span)
        .await
    }
}
