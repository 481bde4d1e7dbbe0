// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use async_trait::async_trait;
use fairsem_core::{Command, MemoryStore, Reply, Store, StoreError, Watched};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Recorded store call
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Exec {
        commands: Vec<Command>,
    },
    Watch {
        key: String,
    },
    ExecWatched {
        key: String,
        commands: Vec<Command>,
    },
}

#[derive(Debug, Default)]
struct Failures {
    unavailable: bool,
    /// Command names (`ZADD`, `DEL`, `WATCH`, ...) that fail any call containing them
    commands: HashSet<&'static str>,
}

/// In-memory store with call recording and failure injection
#[derive(Clone, Debug, Default)]
pub struct FakeStore {
    backend: MemoryStore,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    failures: Arc<Mutex<Failures>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access to the backing keyspace, bypassing recording and failures
    pub fn backend(&self) -> &MemoryStore {
        &self.backend
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Make every call fail as if the store were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .unavailable = unavailable;
    }

    /// Fail any call that contains the named command
    pub fn fail_command(&self, name: &'static str) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .commands
            .insert(name);
    }

    pub fn clear_failures(&self) {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        failures.unavailable = false;
        failures.commands.clear();
    }

    fn record(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn check<'a>(&self, mut names: impl Iterator<Item = &'a str>) -> Result<(), StoreError> {
        let failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        if failures.unavailable {
            return Err(StoreError::Unavailable("injected outage".to_string()));
        }
        match names.find(|name| failures.commands.contains(name)) {
            Some(name) => Err(StoreError::Unavailable(format!("injected {} failure", name))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Store for FakeStore {
    async fn exec(&self, commands: Vec<Command>) -> Result<Vec<Reply>, StoreError> {
        self.record(StoreCall::Exec {
            commands: commands.clone(),
        });
        self.check(commands.iter().map(Command::name))?;
        self.backend.exec(commands).await
    }

    async fn watch(&self, key: &str) -> Result<Watched, StoreError> {
        self.record(StoreCall::Watch {
            key: key.to_string(),
        });
        self.check(std::iter::once("WATCH"))?;
        self.backend.watch(key).await
    }

    async fn exec_watched(
        &self,
        watched: &Watched,
        commands: Vec<Command>,
    ) -> Result<Option<Vec<Reply>>, StoreError> {
        self.record(StoreCall::ExecWatched {
            key: watched.key.clone(),
            commands: commands.clone(),
        });
        self.check(commands.iter().map(Command::name))?;
        self.backend.exec_watched(watched, commands).await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
