//! Configuration for the fatcache client
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{FatcacheError, Result};

/// Default fatcache port
pub const DEFAULT_PORT: u16 = 11211;

/// Default fatcache host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default read chunk size (bytes per `read` call)
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Default upper bound on a single buffered response
///
/// 16 MB of payload plus room for the `VALUE` header and trailers.
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024 + 4096;

/// Main configuration for a client connection
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Endpoint Configuration
    // -------------------------------------------------------------------------
    /// Server host name or address
    pub host: String,

    /// Server TCP port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Timeout Configuration
    // -------------------------------------------------------------------------
    /// Per-call read timeout (milliseconds, 0 = wait forever)
    pub read_timeout_ms: u64,

    /// Connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Socket / Framing Configuration
    // -------------------------------------------------------------------------
    /// Disable Nagle's algorithm
    pub nodelay: bool,

    /// Max bytes requested per read while framing a response
    pub chunk_size: usize,

    /// Max bytes buffered for one response before giving up
    pub max_response_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            read_timeout_ms: 0,
            connect_timeout_ms: 0,
            write_timeout_ms: 0,
            nodelay: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` string suitable for `ToSocketAddrs`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Read timeout as a `Duration` (`None` = block forever)
    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    /// Connect timeout as a `Duration` (`None` = OS default)
    pub fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    /// Write timeout as a `Duration` (`None` = block forever)
    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }

    /// Check the config for values the client cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(FatcacheError::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(FatcacheError::Config("port must not be 0".to_string()));
        }
        if self.chunk_size == 0 {
            return Err(FatcacheError::Config(
                "chunk_size must be at least 1".to_string(),
            ));
        }
        if self.max_response_size < self.chunk_size {
            return Err(FatcacheError::Config(format!(
                "max_response_size ({}) is smaller than chunk_size ({})",
                self.max_response_size, self.chunk_size
            )));
        }
        Ok(())
    }
}

fn millis(ms: u64) -> Option<Duration> {
    if ms > 0 {
        Some(Duration::from_millis(ms))
    } else {
        None
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the read timeout (in milliseconds, 0 = none)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the connect timeout (in milliseconds, 0 = OS default)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds, 0 = none)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    /// Set the read chunk size (in bytes)
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the maximum buffered response size (in bytes)
    pub fn max_response_size(mut self, size: usize) -> Self {
        self.config.max_response_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
