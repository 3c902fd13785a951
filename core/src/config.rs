//! Client configuration.
//!
//! # Design
//! Defaults live here as named constants instead of being baked into the
//! client. Every field can be overridden at construction through the
//! `with_*` builders, or read from any serde format the embedding
//! application already uses for its own settings:
//!
//! ```toml
//! api_key = "br_live_..."
//! base_url = "https://api.blackroad.io"
//! timeout_secs = 30
//! ```
//!
//! Configuration is fixed once a client is built.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.blackroad.io";

/// Per-request timeout covering connect, send and read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client identifier sent on every request.
pub const DEFAULT_USER_AGENT: &str = concat!("BlackRoad-Rust-SDK/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(
        default = "default_timeout",
        rename = "timeout_secs",
        deserialize_with = "deserialize_secs"
    )]
    pub timeout: Duration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ClientConfig {
    /// Config for `api_key` with every other field at its default. The key is
    /// not validated.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }

    /// Endpoints are appended to this verbatim, so it should not end in `/`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn deserialize_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}
