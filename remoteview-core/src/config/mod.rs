mod error;
#[cfg(test)]
mod tests;

pub use error::ConfigError;

use crate::feed::{DEFAULT_HANDSHAKE_TIMEOUT, DEFAULT_LISTEN};
use crate::master::{DEFAULT_BUFFER_SIZE, DEFAULT_MAX_LINE_BYTES, MasterConfig};
use crate::reporting::SlaveConfig;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MASTER_PORT: u16 = 8081;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MasterSection {
    /// e.g. "0.0.0.0"
    #[serde(default = "default_master_host")]
    pub host: String,

    /// `0` picks an ephemeral port.
    #[serde(default = "default_master_port")]
    pub port: u16,

    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Slaves sending a longer unterminated line are disconnected.
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
}

impl Default for MasterSection {
    fn default() -> Self {
        Self {
            host: default_master_host(),
            port: default_master_port(),
            buffer_size: default_buffer_size(),
            max_line_bytes: default_max_line_bytes(),
        }
    }
}

impl MasterSection {
    pub fn master_config(&self) -> MasterConfig {
        MasterConfig {
            host: self.host.clone(),
            port: self.port,
            buffer_size: self.buffer_size,
            max_line_bytes: self.max_line_bytes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedSection {
    /// Where viewers connect, e.g. "127.0.0.1:8082"
    #[serde(default = "default_feed_listen")]
    pub listen: String,

    /// Connections that do not finish the WebSocket handshake in time are dropped.
    #[serde(default = "default_handshake_timeout_ms")]
    pub handshake_timeout_ms: u64,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            listen: default_feed_listen(),
            handshake_timeout_ms: default_handshake_timeout_ms(),
        }
    }
}

impl FeedSection {
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlaveSection {
    #[serde(default = "default_slave_host")]
    pub host: String,

    #[serde(default = "default_master_port")]
    pub port: u16,

    /// Extra connection attempts. Omitted means retry forever.
    #[serde(default)]
    pub retries: Option<u32>,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for SlaveSection {
    fn default() -> Self {
        Self {
            host: default_slave_host(),
            port: default_master_port(),
            retries: None,
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl SlaveSection {
    pub fn slave_config(&self) -> SlaveConfig {
        SlaveConfig {
            host: self.host.clone(),
            port: self.port,
            retries: self.retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

fn default_master_host() -> String {
    "0.0.0.0".to_string()
}

fn default_master_port() -> u16 {
    DEFAULT_MASTER_PORT
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

fn default_max_line_bytes() -> usize {
    DEFAULT_MAX_LINE_BYTES
}

fn default_feed_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

fn default_handshake_timeout_ms() -> u64 {
    DEFAULT_HANDSHAKE_TIMEOUT.as_millis() as u64
}

fn default_slave_host() -> String {
    "127.0.0.1".to_string()
}

fn default_retry_delay_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteviewConfig {
    #[serde(default)]
    pub master: MasterSection,

    #[serde(default)]
    pub feed: FeedSection,

    #[serde(default)]
    pub slave: SlaveSection,
}

impl RemoteviewConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|source| ConfigError::read_file(path, source))?;
        let cfg: Self =
            toml::from_str(&contents).map_err(|source| ConfigError::parse(path, source))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load `path` when given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.master.buffer_size == 0 {
            return Err(ConfigError::Invalid {
                field: "master.buffer_size",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.master.max_line_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "master.max_line_bytes",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.feed.handshake_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "feed.handshake_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }

        if let Err(e) = self.feed.listen.parse::<SocketAddr>() {
            return Err(ConfigError::Invalid {
                field: "feed.listen",
                reason: format!("'{}' is not a socket address: {e}", self.feed.listen),
            });
        }

        Ok(())
    }
}

impl FromStr for RemoteviewConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s).map_err(|source| ConfigError::parse("<string>", source))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
