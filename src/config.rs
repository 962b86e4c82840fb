//! Configuration for the allocator and the HTTP host.
//!
//! Everything has a working default; a JSON file can override any subset of
//! fields.

use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming a JSON configuration file.
pub const CONFIG_PATH_ENV: &str = "CRDT_LSEQ_CONFIG";
/// Environment variable overriding the bind address.
pub const BIND_ADDR_ENV: &str = "CRDT_LSEQ_ADDR";

pub const DEFAULT_BASE: u32 = 1024;
pub const DEFAULT_BOUNDARY: u32 = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("allocator base must be at least 2, got {0}")]
    InvalidBase(u32),
    #[error("allocator boundary must be at least 1")]
    InvalidBoundary,
    #[error("invalid bind address {0:?}")]
    InvalidAddr(String),
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Shape of the position space handed out by the allocator.
///
/// `base` is the exclusive upper bound of every component (the `end` sentinel);
/// `boundary` caps how far from a neighbour a boundary-strategy allocation may
/// land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    pub base: u32,
    pub boundary: u32,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        AllocatorConfig {
            base: DEFAULT_BASE,
            boundary: DEFAULT_BOUNDARY,
        }
    }
}

impl AllocatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base < 2 {
            return Err(ConfigError::InvalidBase(self.base));
        }
        if self.boundary == 0 {
            return Err(ConfigError::InvalidBoundary);
        }
        Ok(())
    }
}

/// Top-level configuration of the `crdt-lseq` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub allocator: AllocatorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            allocator: AllocatorConfig::default(),
        }
    }
}

impl Config {
    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(raw)?;
        config.allocator.validate()?;
        Ok(config)
    }

    /// Loads the file named by [`CONFIG_PATH_ENV`] if set, then applies the
    /// [`BIND_ADDR_ENV`] override.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load(path)?,
            None => Config::default(),
        };

        if let Ok(addr) = std::env::var(BIND_ADDR_ENV) {
            config.bind_addr = addr.parse().map_err(|_| ConfigError::InvalidAddr(addr))?;
        }

        Ok(config)
    }
}
