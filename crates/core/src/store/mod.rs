// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store primitives adapter
//!
//! The coordination protocol never talks to a store client directly. It goes
//! through [`Store`], which offers:
//! - **exec** - an ordered list of commands applied as one all-or-nothing unit
//! - **watch / exec_watched** - optimistic concurrency on a single key
//!
//! Failures surface as [`StoreError`] and are never retried at this layer.

mod command;
mod error;
mod memory;
mod zset;

pub use command::{Command, Reply};
pub use error::StoreError;
pub use memory::MemoryStore;

use async_trait::async_trait;
use std::time::Duration;

/// Snapshot of a watched key
///
/// Passed back to [`Store::exec_watched`], which commits only if the key has
/// not been written since the snapshot was taken.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Watched {
    pub key: String,
    pub value: Option<String>,
    /// Opaque store-assigned version of `key` at watch time
    pub version: u64,
}

/// Capability interface over the shared key-value store
#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    /// Execute `commands` as a single atomic unit, returning replies in order
    async fn exec(&self, commands: Vec<Command>) -> Result<Vec<Reply>, StoreError>;

    /// Read `key` and remember its version
    async fn watch(&self, key: &str) -> Result<Watched, StoreError>;

    /// Execute `commands` atomically iff the watched key is unchanged.
    ///
    /// Returns `Ok(None)` when another writer touched the key and the
    /// transaction was aborted.
    async fn exec_watched(
        &self,
        watched: &Watched,
        commands: Vec<Command>,
    ) -> Result<Option<Vec<Reply>>, StoreError>;

    /// Execute a single command
    async fn run(&self, command: Command) -> Result<Reply, StoreError> {
        let name = command.name();
        self.exec(vec![command])
            .await?
            .pop()
            .ok_or(StoreError::MissingReply(name))
    }

    /// Upsert into a sorted set; `true` if the member was newly inserted
    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<bool, StoreError> {
        self.run(Command::zadd(key, member, score)).await?.into_bool()
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool, StoreError> {
        self.run(Command::setnx(key, value, ttl)).await?.into_bool()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.run(Command::get(key)).await?.into_value()
    }
}

/// Take the reply of the final command in a transaction
pub(crate) fn last_reply(
    mut replies: Vec<Reply>,
    command: &'static str,
) -> Result<Reply, StoreError> {
    replies.pop().ok_or(StoreError::MissingReply(command))
}
