// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fairness ledger: the acquire/release/refresh protocol
//!
//! Two sorted sets and a counter decide admission:
//! - the Semaphore Set scores identifiers by timestamp and drives eviction
//! - the Owner Set scores them by counter value and drives rank
//!
//! Rank in the Owner Set below `limit` means the identifier holds a slot.
//! Using a store-issued counter for rank keeps admission order immune to
//! clock skew between processes.
//!
//! `acquire_fair` must only run while the admission lock is held. Release
//! and refresh only touch the caller's own entries and need no lock.

use super::config::SemaphoreConfig;
use super::keys::SemaphoreKeys;
use crate::store::{last_reply, Command, Reply, Store, StoreError};

/// Admission decision for one attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Admitted { rank: u64 },
    Denied { rank: u64 },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }

    pub fn rank(&self) -> u64 {
        match self {
            Admission::Admitted { rank } | Admission::Denied { rank } => *rank,
        }
    }
}

/// Outcome of refreshing a held identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refresh {
    Held,
    /// The entry had been evicted; the slot is gone
    Lost,
}

#[derive(Clone, Debug)]
pub struct FairnessLedger<S> {
    store: S,
    keys: SemaphoreKeys,
    limit: u32,
    timeout_secs: u64,
}

impl<S: Store> FairnessLedger<S> {
    pub fn new(store: S, keys: SemaphoreKeys, limit: u32, timeout_secs: u64) -> Self {
        Self {
            store,
            keys,
            limit,
            timeout_secs,
        }
    }

    pub fn from_config(store: S, config: &SemaphoreConfig) -> Self {
        Self::new(
            store,
            SemaphoreKeys::new(&config.name),
            config.limit,
            config.timeout_secs(),
        )
    }

    pub fn keys(&self) -> &SemaphoreKeys {
        &self.keys
    }

    /// Try to admit `identifier` at wall-clock second `now`.
    ///
    /// A denied identifier is removed again on a best-effort basis; if that
    /// cleanup fails the orphaned entries age out through eviction.
    pub async fn acquire_fair(&self, identifier: &str, now: u64) -> Result<Admission, StoreError> {
        let keys = &self.keys;
        let cutoff = now as f64 - self.timeout_secs as f64;

        let replies = self
            .store
            .exec(vec![
                Command::zremrangebyscore(&keys.set, cutoff),
                // Weight 0 on the Semaphore Set keeps surviving counter values intact
                Command::zinterstore(
                    &keys.owner,
                    vec![(keys.owner.clone(), 1.0), (keys.set.clone(), 0.0)],
                ),
                Command::incr(&keys.counter),
            ])
            .await?;
        let [evicted, _, counter] = three(replies, "INCR")?;
        let evicted = evicted.into_int()?;
        let counter = counter.into_int()?;

        let replies = self
            .store
            .exec(vec![
                Command::zadd(&keys.set, identifier, now as f64),
                Command::zadd(&keys.owner, identifier, counter as f64),
                Command::zrank(&keys.owner, identifier),
            ])
            .await?;
        let rank = last_reply(replies, "ZRANK")?
            .into_rank()?
            .ok_or(StoreError::UnexpectedReply {
                expected: "rank of member just added",
                reply: Reply::Nil,
            })?;

        tracing::debug!(
            name = %keys.set,
            identifier,
            counter,
            rank,
            evicted,
            limit = self.limit,
            "admission decided"
        );

        if rank < u64::from(self.limit) {
            return Ok(Admission::Admitted { rank });
        }

        if let Err(e) = self.release_fair(identifier).await {
            tracing::warn!(name = %keys.set, identifier, error = %e, "failed to clean up denied entry");
        }
        Ok(Admission::Denied { rank })
    }

    /// Remove `identifier` from both sets. Returns whether it was present;
    /// releasing an absent identifier is not an error.
    pub async fn release_fair(&self, identifier: &str) -> Result<bool, StoreError> {
        let replies = self
            .store
            .exec(vec![
                Command::zrem(&self.keys.set, identifier),
                Command::zrem(&self.keys.owner, identifier),
            ])
            .await?;
        replies
            .into_iter()
            .next()
            .ok_or(StoreError::MissingReply("ZREM"))?
            .into_bool()
    }

    /// Re-stamp `identifier` with `now`.
    ///
    /// If the stamp created a new entry, the identifier had been evicted:
    /// its entries are released and the slot reported lost. Once the
    /// insert is seen the slot is gone, so a failed cleanup still reports
    /// `Lost` and the stray entry ages out through eviction.
    pub async fn refresh_fair(&self, identifier: &str, now: u64) -> Result<Refresh, StoreError> {
        let inserted = self
            .store
            .zadd(&self.keys.set, identifier, now as f64)
            .await?;
        if inserted {
            if let Err(e) = self.release_fair(identifier).await {
                tracing::warn!(name = %self.keys.set, identifier, error = %e, "failed to clean up lost entry");
            }
            return Ok(Refresh::Lost);
        }
        Ok(Refresh::Held)
    }

    /// Number of identifiers currently in the Owner Set
    pub async fn occupancy(&self) -> Result<u64, StoreError> {
        let count = self.store.run(Command::zcard(&self.keys.owner)).await?;
        Ok(count.into_int()?.max(0) as u64)
    }
}

fn three(replies: Vec<Reply>, command: &'static str) -> Result<[Reply; 3], StoreError> {
    <[Reply; 3]>::try_from(replies).map_err(|_| StoreError::MissingReply(command))
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
