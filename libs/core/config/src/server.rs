//! Listener settings for the HTTP server.

use crate::{env_parse, ConfigError, FromEnv};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Where the API listens and how long shutdown cleanup may run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address; an IP literal, not a hostname
    pub host: IpAddr,
    pub port: u16,
    /// Upper bound for cleanup once the listener has drained
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// `HOST` (default `0.0.0.0`), `PORT` (default `8080`) and
    /// `SHUTDOWN_TIMEOUT_SECS` (default `30`)
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_parse("HOST", "0.0.0.0")?,
            port: env_parse("PORT", "8080")?,
            shutdown_timeout: Duration::from_secs(env_parse("SHUTDOWN_TIMEOUT_SECS", "30")?),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}
