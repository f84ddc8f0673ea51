//! Server configuration.
//!
//! Configuration is an explicit value constructed at startup and
//! passed into the pieces that need it - never ambient process-wide
//! state.

use std::net::{IpAddr, Ipv6Addr, SocketAddr};

/// The default port. ("ANALY" typed on a phone keypad.)
pub const DEFAULT_PORT: u16 = 26259;

/// Configuration for the profile server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP binding listens on.
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Creates a configuration listening on the given address.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self { bind_addr }
    }

    /// Sets the bind address.
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        // All interfaces, v6 unspecified also accepts v4 on dual-stack hosts.
        Self::new(SocketAddr::from((
            IpAddr::V6(Ipv6Addr::UNSPECIFIED),
            DEFAULT_PORT,
        )))
    }
}
