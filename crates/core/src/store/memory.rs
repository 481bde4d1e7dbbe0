// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process store backend
//!
//! A single mutex guards the whole keyspace, so every `exec` is trivially
//! atomic. Semantics follow Redis where the protocol depends on them:
//! empty sorted sets disappear, ZINTERSTORE overwrites its destination, and
//! key expiry counts as a write for WATCH.

use super::zset::SortedSet;
use super::{Command, Reply, Store, StoreError, Watched};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

#[derive(Clone, Debug)]
enum Value {
    Str(String),
    Sorted(SortedSet),
}

#[derive(Clone, Debug)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

#[derive(Clone, Debug, Default)]
struct Keyspace {
    entries: HashMap<String, Entry>,
    /// Bumped on every write; never removed so deletes are observable
    versions: HashMap<String, u64>,
}

impl Keyspace {
    fn touch(&mut self, key: &str) {
        *self.versions.entry(key.to_string()).or_insert(0) += 1;
    }

    fn version(&self, key: &str) -> u64 {
        self.versions.get(key).copied().unwrap_or(0)
    }

    fn purge_expired(&mut self, now: Instant) {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| e.expires_at.is_some_and(|at| at <= now))
            .map(|(k, _)| k.clone())
            .collect();
        for key in expired {
            self.entries.remove(&key);
            self.touch(&key);
        }
    }

    fn sorted(&self, key: &str) -> Result<Option<&SortedSet>, StoreError> {
        match self.entries.get(key).map(|e| &e.value) {
            None => Ok(None),
            Some(Value::Sorted(set)) => Ok(Some(set)),
            Some(Value::Str(_)) => Err(wrong_type(key, "sorted set")),
        }
    }

    fn sorted_mut(&mut self, key: &str) -> Result<Option<&mut SortedSet>, StoreError> {
        match self.entries.get_mut(key).map(|e| &mut e.value) {
            None => Ok(None),
            Some(Value::Sorted(set)) => Ok(Some(set)),
            Some(Value::Str(_)) => Err(wrong_type(key, "sorted set")),
        }
    }

    /// Drop a sorted set that has become empty
    fn reap_if_empty(&mut self, key: &str) {
        if matches!(self.entries.get(key), Some(Entry { value: Value::Sorted(s), .. }) if s.is_empty())
        {
            self.entries.remove(key);
        }
    }

    fn apply(&mut self, command: Command, now: Instant) -> Result<Reply, StoreError> {
        match command {
            Command::ZAdd { key, member, score } => {
                let added = match self.sorted_mut(&key)? {
                    Some(set) => set.insert(&member, score),
                    None => {
                        let mut set = SortedSet::default();
                        set.insert(&member, score);
                        self.entries.insert(
                            key.clone(),
                            Entry {
                                value: Value::Sorted(set),
                                expires_at: None,
                            },
                        );
                        true
                    }
                };
                self.touch(&key);
                Ok(Reply::Int(i64::from(added)))
            }

            Command::ZRem { key, member } => {
                let removed = self
                    .sorted_mut(&key)?
                    .is_some_and(|set| set.remove(&member));
                if removed {
                    self.reap_if_empty(&key);
                    self.touch(&key);
                }
                Ok(Reply::Int(i64::from(removed)))
            }

            Command::ZRank { key, member } => {
                let rank = self.sorted(&key)?.and_then(|set| set.rank(&member));
                Ok(rank.map_or(Reply::Nil, |r| Reply::Int(r as i64)))
            }

            Command::ZRemRangeByScore { key, max } => {
                let removed = self
                    .sorted_mut(&key)?
                    .map_or(0, |set| set.remove_range_by_score(max));
                if removed > 0 {
                    self.reap_if_empty(&key);
                    self.touch(&key);
                }
                Ok(Reply::Int(removed as i64))
            }

            Command::ZInterStore { dest, sources } => {
                let result = self.intersect(&sources)?;
                let len = result.len();
                if result.is_empty() {
                    self.entries.remove(&dest);
                } else {
                    self.entries.insert(
                        dest.clone(),
                        Entry {
                            value: Value::Sorted(result),
                            expires_at: None,
                        },
                    );
                }
                self.touch(&dest);
                Ok(Reply::Int(len as i64))
            }

            Command::ZCard { key } => {
                let len = self.sorted(&key)?.map_or(0, SortedSet::len);
                Ok(Reply::Int(len as i64))
            }

            Command::Incr { key } => {
                let current = match self.entries.get(&key).map(|e| &e.value) {
                    None => 0,
                    Some(Value::Str(s)) => s
                        .parse::<i64>()
                        .map_err(|_| wrong_type(&key, "integer"))?,
                    Some(Value::Sorted(_)) => return Err(wrong_type(&key, "integer")),
                };
                let next = current
                    .checked_add(1)
                    .ok_or_else(|| StoreError::Overflow(key.clone()))?;
                let expires_at = self.entries.get(&key).and_then(|e| e.expires_at);
                self.entries.insert(
                    key.clone(),
                    Entry {
                        value: Value::Str(next.to_string()),
                        expires_at,
                    },
                );
                self.touch(&key);
                Ok(Reply::Int(next))
            }

            Command::SetNx { key, value, ttl } => {
                if self.entries.contains_key(&key) {
                    return Ok(Reply::Bool(false));
                }
                self.entries.insert(
                    key.clone(),
                    Entry {
                        value: Value::Str(value),
                        expires_at: ttl.map(|t| now + t),
                    },
                );
                self.touch(&key);
                Ok(Reply::Bool(true))
            }

            Command::Get { key } => match self.entries.get(&key).map(|e| &e.value) {
                None => Ok(Reply::Nil),
                Some(Value::Str(s)) => Ok(Reply::Bulk(s.clone())),
                Some(Value::Sorted(_)) => Err(wrong_type(&key, "string")),
            },

            Command::Del { key } => {
                let removed = self.entries.remove(&key).is_some();
                if removed {
                    self.touch(&key);
                }
                Ok(Reply::Int(i64::from(removed)))
            }
        }
    }

    /// Weighted intersection with SUM aggregation. Missing keys are empty sets.
    fn intersect(&self, sources: &[(String, f64)]) -> Result<SortedSet, StoreError> {
        let mut sets = Vec::with_capacity(sources.len());
        for (key, weight) in sources {
            match self.sorted(key)? {
                Some(set) => sets.push((set, *weight)),
                None => return Ok(SortedSet::default()),
            }
        }

        let mut result = SortedSet::default();
        let Some((first, _)) = sets.first() else {
            return Ok(result);
        };
        for (member, _) in first.iter() {
            let mut total = 0.0;
            let mut present = true;
            for (set, weight) in &sets {
                match set.score(member) {
                    Some(score) => total += score * weight,
                    None => {
                        present = false;
                        break;
                    }
                }
            }
            if present {
                result.insert(member, total);
            }
        }
        Ok(result)
    }
}

fn wrong_type(key: &str, expected: &'static str) -> StoreError {
    StoreError::WrongType {
        key: key.to_string(),
        expected,
    }
}

/// Shared in-memory store. Clones are handles onto the same keyspace.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Keyspace>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        let mut keyspace = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        keyspace.purge_expired(Instant::now());
        keyspace.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Members of a sorted set in rank order, for inspection in tests and tools
    pub fn members(&self, key: &str) -> Result<Vec<(String, f64)>, StoreError> {
        let keyspace = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(keyspace
            .sorted(key)?
            .map(|set| set.iter().map(|(m, s)| (m.to_string(), s)).collect())
            .unwrap_or_default())
    }

    fn exec_locked(
        keyspace: &mut Keyspace,
        commands: Vec<Command>,
        now: Instant,
    ) -> Result<Vec<Reply>, StoreError> {
        // Apply to a scratch copy so a failing command leaves no partial writes
        let mut scratch = keyspace.clone();
        let replies = commands
            .into_iter()
            .map(|command| scratch.apply(command, now))
            .collect::<Result<Vec<_>, _>>()?;
        *keyspace = scratch;
        Ok(replies)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn exec(&self, commands: Vec<Command>) -> Result<Vec<Reply>, StoreError> {
        let now = Instant::now();
        let mut keyspace = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        keyspace.purge_expired(now);
        Self::exec_locked(&mut keyspace, commands, now)
    }

    async fn watch(&self, key: &str) -> Result<Watched, StoreError> {
        let now = Instant::now();
        let mut keyspace = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        keyspace.purge_expired(now);
        let value = keyspace.apply(Command::get(key), now)?.into_value()?;
        Ok(Watched {
            key: key.to_string(),
            value,
            version: keyspace.version(key),
        })
    }

    async fn exec_watched(
        &self,
        watched: &Watched,
        commands: Vec<Command>,
    ) -> Result<Option<Vec<Reply>>, StoreError> {
        let now = Instant::now();
        let mut keyspace = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        keyspace.purge_expired(now);
        if keyspace.version(&watched.key) != watched.version {
            return Ok(None);
        }
        Self::exec_locked(&mut keyspace, commands, now).map(Some)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
