//! Executor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("corenlp-client/", env!("CARGO_PKG_VERSION"));

/// Client-wide settings for [`crate::ReqwestExecutor`].
///
/// `timeout` applies to every exchange regardless of the call's own
/// [`protocol::CallContext`] deadline; the earlier of the two wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpExecutorConfig {
    /// Total time allowed for one exchange, body included. `None` disables it.
    pub timeout: Option<Duration>,
    /// Time allowed to establish a connection. `None` disables it.
    pub connect_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for HttpExecutorConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Some(Duration::from_secs(10)),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_connect_timeout_only() {
        let config = HttpExecutorConfig::default();
        assert_eq!(config.timeout, None);
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(10)));
        assert!(config.user_agent.starts_with("corenlp-client/"));
    }
}
