//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a profile client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the profile server.
    pub server_url: String,
    /// Directory for the on-disk identity cache.
    pub cache_dir: PathBuf,
    /// Request timeout for [`crate::HttpClient`] implementations to
    /// honor. There is no automatic retry.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration for the given server URL.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            cache_dir: PathBuf::from("profiledb"),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the identity cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:26259")
    }
}
