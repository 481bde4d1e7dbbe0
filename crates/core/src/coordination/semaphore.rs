// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semaphore handle: the public acquire/release/refresh contract
//!
//! A handle holds at most one slot. State machine:
//!
//! ```text
//! Unheld --acquire ok--> Held --release | refresh lost--> Unheld
//!                        Held --refresh held--> Held
//! ```

use super::config::{ConfigError, SemaphoreConfig};
use super::ledger::{Admission, FairnessLedger, Refresh};
use super::lock::{Lock, LockRelease};
use crate::clock::{Clock, SystemClock};
use crate::id::{IdGen, UuidIdGen};
use crate::store::{Store, StoreError};
use std::time::Duration;
use tokio::time::Instant;

/// Retry policy for [`Semaphore::acquire`]
///
/// Retries happen only when both `sleep` and `max_retries` are non-zero.
/// The default is a single non-blocking attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AcquireOptions {
    pub sleep: Duration,
    pub max_retries: u32,
    /// Give up once the next retry would start after this instant
    pub deadline: Option<Instant>,
}

impl AcquireOptions {
    pub fn once() -> Self {
        Self::default()
    }

    pub fn retry(sleep: Duration, max_retries: u32) -> Self {
        Self {
            sleep,
            max_retries,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Client-side handle onto a named distributed semaphore
pub struct Semaphore<S, C = SystemClock, G = UuidIdGen> {
    config: SemaphoreConfig,
    ledger: FairnessLedger<S>,
    lock: Lock<S, G>,
    clock: C,
    ids: G,
    identifier: Option<String>,
}

impl<S: Store> Semaphore<S> {
    /// Handle using the system clock and random UUID identifiers
    pub fn new(store: S, config: SemaphoreConfig) -> Result<Self, ConfigError> {
        Self::with_capabilities(store, config, SystemClock, UuidIdGen)
    }
}

impl<S: Store, C: Clock, G: IdGen> Semaphore<S, C, G> {
    pub fn with_capabilities(
        store: S,
        config: SemaphoreConfig,
        clock: C,
        ids: G,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let ledger = FairnessLedger::from_config(store.clone(), &config);
        let lock = Lock::new(store, ids.clone(), ledger.keys()).with_ttl(config.lock_expiry());
        Ok(Self {
            config,
            ledger,
            lock,
            clock,
            ids,
            identifier: None,
        })
    }

    pub fn config(&self) -> &SemaphoreConfig {
        &self.config
    }

    pub fn ledger(&self) -> &FairnessLedger<S> {
        &self.ledger
    }

    /// Ledger identifier of the held slot
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn is_held(&self) -> bool {
        self.identifier.is_some()
    }

    /// Acquire a slot, retrying per `options`.
    ///
    /// Returns `Ok(true)` immediately if this handle already holds a slot.
    /// `Ok(false)` covers both lock contention and admission denial.
    pub async fn acquire(&mut self, options: AcquireOptions) -> Result<bool, StoreError> {
        if self.is_held() {
            return Ok(true);
        }

        let mut retries_left = options.max_retries;
        loop {
            if self.attempt().await? {
                return Ok(true);
            }
            if retries_left == 0 || options.sleep.is_zero() {
                return Ok(false);
            }
            if options
                .deadline
                .is_some_and(|deadline| Instant::now() + options.sleep > deadline)
            {
                tracing::debug!(name = %self.config.name, "acquire deadline reached");
                return Ok(false);
            }
            retries_left -= 1;
            tokio::time::sleep(options.sleep).await;
        }
    }

    /// Single non-blocking attempt
    pub async fn try_acquire(&mut self) -> Result<bool, StoreError> {
        self.acquire(AcquireOptions::once()).await
    }

    /// Give the slot back. A no-op when nothing is held.
    ///
    /// The handle is unheld afterwards even if the store call fails; the
    /// orphaned entries then age out through eviction.
    pub async fn release(&mut self) -> Result<(), StoreError> {
        let Some(identifier) = self.identifier.take() else {
            return Ok(());
        };
        let present = self.ledger.release_fair(&identifier).await?;
        tracing::info!(name = %self.config.name, %identifier, present, "semaphore released");
        Ok(())
    }

    /// Re-stamp the held slot so it is not evicted.
    ///
    /// Returns whether the slot is still held.
    pub async fn refresh(&mut self) -> Result<bool, StoreError> {
        let Some(identifier) = self.identifier.as_deref() else {
            return Ok(false);
        };
        let now = self.clock.epoch_secs();
        match self.ledger.refresh_fair(identifier, now).await? {
            Refresh::Held => Ok(true),
            Refresh::Lost => {
                tracing::info!(name = %self.config.name, identifier, "semaphore lost before refresh");
                self.identifier = None;
                Ok(false)
            }
        }
    }

    /// One lock-guarded admission attempt
    async fn attempt(&mut self) -> Result<bool, StoreError> {
        let Some(token) = self.lock.acquire(self.config.lock_wait).await? else {
            tracing::debug!(name = %self.config.name, "admission lock not obtained");
            return Ok(false);
        };

        let identifier = self.ids.next();
        let now = self.clock.epoch_secs();
        let admission = self.ledger.acquire_fair(&identifier, now).await;

        // The lock is released on every path, including a failed admission
        let released = self.lock.release(&token).await;
        match (&admission, released) {
            (_, Ok(LockRelease::Released)) => {}
            (_, Ok(LockRelease::Lost)) => {
                tracing::warn!(name = %self.config.name, "admission lock expired mid-attempt");
            }
            (Ok(Admission::Admitted { .. }), Err(e)) => {
                tracing::warn!(name = %self.config.name, error = %e, "failed to release admission lock");
            }
            // Nothing was gained, so the release failure is the caller's problem
            (Ok(Admission::Denied { .. }), Err(e)) => return Err(e),
            (Err(_), Err(e)) => {
                tracing::warn!(name = %self.config.name, error = %e, "failed to release admission lock");
            }
        }

        match admission? {
            Admission::Admitted { rank } => {
                tracing::info!(name = %self.config.name, %identifier, rank, "semaphore acquired");
                self.identifier = Some(identifier);
                Ok(true)
            }
            Admission::Denied { rank } => {
                tracing::debug!(name = %self.config.name, rank, limit = self.config.limit, "admission denied");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
#[path = "semaphore_tests.rs"]
mod tests;
