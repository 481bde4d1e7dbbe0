// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Short-lived mutual-exclusion lock
//!
//! Serializes the admission decision for one semaphore across every process
//! sharing the store. Acquisition spins on set-if-absent; release is a
//! watched compare-and-delete so a holder that overstayed its window can
//! never delete a lock someone else now owns.

use super::keys::SemaphoreKeys;
use crate::id::IdGen;
use crate::store::{Command, Store, StoreError};
use std::time::Duration;
use tokio::time::Instant;

/// Pause between set-if-absent attempts
pub const SPIN_INTERVAL: Duration = Duration::from_millis(1);

/// Owner token proving who holds the lock
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LockToken(String);

impl LockToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LockToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of releasing the lock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockRelease {
    Released,
    /// The key no longer carried our token, or changed under the watch
    Lost,
}

/// Store-backed lock keyed by `lock:<name>`
#[derive(Clone, Debug)]
pub struct Lock<S, G> {
    store: S,
    ids: G,
    key: String,
    ttl: Option<Duration>,
}

impl<S: Store, G: IdGen> Lock<S, G> {
    pub fn new(store: S, ids: G, keys: &SemaphoreKeys) -> Self {
        Self {
            store,
            ids,
            key: keys.lock.clone(),
            ttl: None,
        }
    }

    /// Have the store expire the key after `ttl`, reclaiming locks of
    /// crashed holders
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Spin until the lock is ours or `max_wait` elapses.
    ///
    /// Always makes at least one attempt. `Ok(None)` means the lock was not
    /// obtained, which is normal under contention.
    pub async fn acquire(&self, max_wait: Duration) -> Result<Option<LockToken>, StoreError> {
        let token = LockToken(self.ids.next());
        let deadline = Instant::now() + max_wait;

        loop {
            if self
                .store
                .set_if_absent(&self.key, token.as_str(), self.ttl)
                .await?
            {
                tracing::trace!(key = %self.key, %token, "lock acquired");
                return Ok(Some(token));
            }
            if Instant::now() >= deadline {
                tracing::trace!(key = %self.key, "lock wait elapsed");
                return Ok(None);
            }
            tokio::time::sleep(SPIN_INTERVAL).await;
        }
    }

    /// Delete the lock iff it still carries `token`
    pub async fn release(&self, token: &LockToken) -> Result<LockRelease, StoreError> {
        let watched = self.store.watch(&self.key).await?;
        if watched.value.as_deref() != Some(token.as_str()) {
            tracing::warn!(key = %self.key, %token, "lock lost before release");
            return Ok(LockRelease::Lost);
        }

        match self
            .store
            .exec_watched(&watched, vec![Command::del(&self.key)])
            .await?
        {
            Some(_) => Ok(LockRelease::Released),
            None => {
                tracing::warn!(key = %self.key, %token, "lock changed during release");
                Ok(LockRelease::Lost)
            }
        }
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
