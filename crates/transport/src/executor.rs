//! [`RequestExecutor`] over `reqwest`.

use std::future::Future;

use async_trait::async_trait;
use protocol::{
    CallContext, ExchangeRequest, ExchangeResponse, RequestExecutor, ResponseBody, TransportError,
};
use reqwest::header::HeaderValue;

use crate::config::HttpExecutorConfig;
use crate::errors::ExecutorBuildError;

/// Production executor backed by a shared `reqwest::Client`.
///
/// Cloning is cheap and clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: reqwest::Client,
}

impl ReqwestExecutor {
    /// Builds an executor with its own `reqwest::Client`.
    pub fn new(config: &HttpExecutorConfig) -> Result<Self, ExecutorBuildError> {
        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|_| {
            ExecutorBuildError::InvalidUserAgent {
                user_agent: config.user_agent.clone(),
            }
        })?;

        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wraps a caller-built client, e.g. one with custom TLS roots or proxies.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RequestExecutor for ReqwestExecutor {
    async fn execute(
        &self,
        ctx: &CallContext,
        request: ExchangeRequest,
    ) -> Result<ExchangeResponse, TransportError> {
        let method =
            reqwest::Method::from_bytes(request.method.as_bytes()).map_err(TransportError::send)?;

        tracing::debug!(%method, url = %request.url, body_bytes = request.body.len(), "executing request");

        let mut builder = self
            .client
            .request(method, request.url.as_str())
            .body(request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = within(ctx, builder.send())
            .await?
            .map_err(|e| classify(e, TransportError::send))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        tracing::debug!(status, "received response head");

        Ok(ExchangeResponse {
            status,
            headers,
            body: Box::new(ReqwestBody {
                response,
                ctx: ctx.clone(),
            }),
        })
    }
}

/// Unread body of a live response. Reading observes the originating call's
/// context.
struct ReqwestBody {
    response: reqwest::Response,
    ctx: CallContext,
}

#[async_trait]
impl ResponseBody for ReqwestBody {
    async fn read_to_end(self: Box<Self>) -> Result<Vec<u8>, TransportError> {
        let Self { response, ctx } = *self;
        let bytes = within(&ctx, response.bytes())
            .await?
            .map_err(|e| classify(e, TransportError::body_read))?;
        Ok(bytes.to_vec())
    }
}

/// Maps reqwest's own timeouts onto the deadline variant so callers see one
/// kind of timeout regardless of whether the client-wide timeout or the
/// call's deadline fired.
fn classify(e: reqwest::Error, otherwise: fn(reqwest::Error) -> TransportError) -> TransportError {
    if e.is_timeout() {
        TransportError::DeadlineExceeded
    } else {
        otherwise(e)
    }
}

/// Runs `fut` until it completes, the context is cancelled, or its deadline
/// passes. Dropping `fut` on the losing branches aborts the exchange.
async fn within<F, T>(ctx: &CallContext, fut: F) -> Result<T, TransportError>
where
    F: Future<Output = T>,
{
    if ctx.is_cancelled() {
        tracing::warn!("call cancelled before exchange");
        return Err(TransportError::Cancelled);
    }
    if ctx.remaining().is_some_and(|r| r.is_zero()) {
        tracing::warn!("call deadline passed before exchange");
        return Err(TransportError::DeadlineExceeded);
    }

    let deadline = async {
        match ctx.remaining() {
            Some(remaining) => tokio::time::sleep(remaining).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        _ = ctx.cancellation().cancelled() => {
            tracing::warn!("call cancelled during exchange");
            Err(TransportError::Cancelled)
        }
        _ = deadline => {
            tracing::warn!("call deadline exceeded during exchange");
            Err(TransportError::DeadlineExceeded)
        }
        out = fut => Ok(out),
    }
}
