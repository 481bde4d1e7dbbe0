// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrapper for consistent observability

use async_trait::async_trait;
use fairsem_core::{Command, Reply, Store, StoreError, Watched};
use tracing::Instrument;

/// Wrapper that adds tracing to any Store
#[derive(Clone, Debug)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

/// `ZADD,ZADD,ZRANK` style summary of a transaction
fn command_names(commands: &[Command]) -> String {
    commands
        .iter()
        .map(Command::name)
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl<S: Store> Store for TracedStore<S> {
    async fn exec(&self, commands: Vec<Command>) -> Result<Vec<Reply>, StoreError> {
        let span = tracing::info_span!(
            "store.exec",
            commands = %command_names(&commands),
            key = commands.first().map(Command::key).unwrap_or_default(),
        );

        async move {
            let start = std::time::Instant::now();
            let result = self.inner.exec(commands).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(replies) => tracing::debug!(
                    replies = replies.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "executed"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "exec failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn watch(&self, key: &str) -> Result<Watched, StoreError> {
        let span = tracing::info_span!("store.watch", key);

        async move {
            let result = self.inner.watch(key).await;
            match &result {
                Ok(watched) => tracing::trace!(
                    present = watched.value.is_some(),
                    version = watched.version,
                    "watching"
                ),
                Err(e) => tracing::error!(error = %e, "watch failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn exec_watched(
        &self,
        watched: &Watched,
        commands: Vec<Command>,
    ) -> Result<Option<Vec<Reply>>, StoreError> {
        let span = tracing::info_span!(
            "store.exec_watched",
            key = %watched.key,
            commands = %command_names(&commands),
        );

        async move {
            let start = std::time::Instant::now();
            let result = self.inner.exec_watched(watched, commands).await;
            let elapsed = start.elapsed();

            // An abort is a normal outcome of optimistic concurrency
            match &result {
                Ok(Some(_)) => {
                    tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "committed")
                }
                Ok(None) => tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    "aborted: watched key changed"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "exec_watched failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
