//! Client configuration.
//!
//! Configuration is a plain serde struct so it can be embedded in a caller's
//! own config file, with [`ClientConfig::from_env`] for twelve-factor style
//! deployments.

use protocol::FramingPolicy;
use serde::{Deserialize, Serialize};

/// Address used when none is configured: a CoreNLP server on its default port.
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:9000";

/// Environment variable holding the service address.
pub const ADDRESS_ENV: &str = "CORENLP_ADDRESS";

/// Environment variable holding the framing policy (`lenient` or `strict`).
pub const FRAMING_ENV: &str = "CORENLP_FRAMING";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Absolute URL of the CoreNLP server.
    pub address: String,
    /// How strictly response size prefixes are enforced.
    pub framing: FramingPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            framing: FramingPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from `CORENLP_ADDRESS` and `CORENLP_FRAMING`,
    /// falling back to defaults for unset variables.
    ///
    /// An unrecognised framing value is logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(address) = lookup(ADDRESS_ENV) {
            config.address = address;
        }

        if let Some(raw) = lookup(FRAMING_ENV) {
            match raw.parse::<FramingPolicy>() {
                Ok(framing) => config.framing = framing,
                Err(e) => tracing::warn!(variable = FRAMING_ENV, error = %e, "ignoring framing policy"),
            }
        }

        config
    }
}
