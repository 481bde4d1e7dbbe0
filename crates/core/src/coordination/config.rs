// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semaphore configuration
//!
//! Loadable from TOML:
//!
//! ```toml
//! name = "render-farm"
//! limit = 10
//! timeout = "50s"
//! lock_wait = "10ms"
//! lock_ttl = "10s"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from building or loading a [`SemaphoreConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("semaphore name must not be empty")]
    EmptyName,
    #[error("semaphore limit must be at least 1")]
    ZeroLimit,
    #[error("semaphore timeout must be at least one second, got {0:?}")]
    TimeoutTooShort(Duration),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Semaphore configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SemaphoreConfig {
    /// Name identifying the shared semaphore instance
    pub name: String,
    /// Maximum concurrent holders
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Staleness window before a holder is evicted (whole seconds)
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
    /// How long one attempt spins for the admission lock
    #[serde(default = "default_lock_wait", with = "humantime_serde")]
    pub lock_wait: Duration,
    /// Server-side expiry of the admission lock; zero disables expiry
    #[serde(default = "default_lock_ttl", with = "humantime_serde")]
    pub lock_ttl: Duration,
}

fn default_limit() -> u32 {
    1
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_lock_wait() -> Duration {
    Duration::from_millis(10)
}

fn default_lock_ttl() -> Duration {
    Duration::from_secs(10)
}

impl SemaphoreConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            limit: default_limit(),
            timeout: default_timeout(),
            lock_wait: default_lock_wait(),
            lock_ttl: default_lock_ttl(),
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_lock_wait(mut self, wait: Duration) -> Self {
        self.lock_wait = wait;
        self
    }

    pub fn with_lock_ttl(mut self, ttl: Duration) -> Self {
        self.lock_ttl = ttl;
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        if self.timeout.as_secs() == 0 {
            return Err(ConfigError::TimeoutTooShort(self.timeout));
        }
        Ok(())
    }

    /// Eviction window in ledger resolution
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }

    /// Lock expiry to request from the store, if any
    pub fn lock_expiry(&self) -> Option<Duration> {
        (!self.lock_ttl.is_zero()).then_some(self.lock_ttl)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
