// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod config;
pub mod simulate;

use anyhow::{Context, Result};
use clap::Args;
use fairsem_core::SemaphoreConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Semaphore name used when neither a config file nor `--name` gives one
pub const DEFAULT_NAME: &str = "fairsem";

/// Configuration sources shared by every command: a TOML file plus flag overrides
#[derive(Args, Debug, Default)]
pub struct SemaphoreArgs {
    /// Semaphore config file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Semaphore name
    #[arg(long)]
    pub name: Option<String>,

    /// Maximum concurrent holders
    #[arg(long)]
    pub limit: Option<u32>,

    /// Seconds before an unrefreshed holder is evicted
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Milliseconds one attempt spins for the admission lock
    #[arg(long, value_name = "MS")]
    pub lock_wait_ms: Option<u64>,

    /// Seconds before an abandoned admission lock expires (0 disables)
    #[arg(long, value_name = "SECS")]
    pub lock_ttl: Option<u64>,
}

impl SemaphoreArgs {
    /// Load the config file (if any), apply flag overrides, and validate
    pub fn resolve(&self) -> Result<SemaphoreConfig> {
        let mut config = match &self.config {
            Some(path) => SemaphoreConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SemaphoreConfig::new(DEFAULT_NAME),
        };

        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = self.lock_wait_ms {
            config.lock_wait = Duration::from_millis(ms);
        }
        if let Some(secs) = self.lock_ttl {
            config.lock_ttl = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
