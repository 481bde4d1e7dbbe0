// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fairsem simulate` - In-process contention run
//!
//! Spawns workers that repeatedly acquire, hold, refresh, and release one
//! semaphore on a shared in-memory store, counting how many are inside the
//! critical section at once.

use super::SemaphoreArgs;
use anyhow::{bail, Result};
use clap::Args;
use fairsem_adapters::TracedStore;
use fairsem_core::{AcquireOptions, MemoryStore, Semaphore, SemaphoreConfig, Store};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub semaphore: SemaphoreArgs,

    /// Number of concurrent workers
    #[arg(long, default_value_t = 8)]
    pub workers: usize,

    /// Acquire/release cycles per worker
    #[arg(long, default_value_t = 5)]
    pub rounds: usize,

    /// Milliseconds each worker holds its slot
    #[arg(long, default_value_t = 5)]
    pub hold_ms: u64,

    /// Milliseconds between acquire retries
    #[arg(long, default_value_t = 2)]
    pub sleep_ms: u64,

    /// Retries before a worker gives up on a round
    #[arg(long, default_value_t = 1000)]
    pub max_retries: u32,
}

/// Shape of a simulation run
#[derive(Clone, Copy, Debug)]
pub struct Plan {
    pub workers: usize,
    pub rounds: usize,
    pub hold: Duration,
    pub retry: AcquireOptions,
}

impl From<&SimulateArgs> for Plan {
    fn from(args: &SimulateArgs) -> Self {
        Self {
            workers: args.workers,
            rounds: args.rounds,
            hold: Duration::from_millis(args.hold_ms),
            retry: AcquireOptions::retry(Duration::from_millis(args.sleep_ms), args.max_retries),
        }
    }
}

/// Outcome of a simulation run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub limit: u32,
    pub acquired: usize,
    pub gave_up: usize,
    /// Rounds where a refresh found the slot already evicted
    pub lost: usize,
    pub max_concurrent: usize,
    /// Owner Set entries left after every worker finished, stale ones included
    pub leftover: u64,
}

impl Report {
    pub fn exceeded_limit(&self) -> bool {
        self.max_concurrent > self.limit as usize
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "acquired: {}, gave up: {}, lost: {}",
            self.acquired, self.gave_up, self.lost
        )?;
        writeln!(f, "leftover owner entries: {}", self.leftover)?;
        write!(
            f,
            "max concurrent: {} / limit {}",
            self.max_concurrent, self.limit
        )
    }
}

#[derive(Default)]
struct WorkerTally {
    acquired: usize,
    gave_up: usize,
    lost: usize,
}

pub async fn simulate(args: SimulateArgs) -> Result<()> {
    let config = args.semaphore.resolve()?;
    let plan = Plan::from(&args);

    println!(
        "simulating {} workers x {} rounds on '{}' (limit {})",
        plan.workers, plan.rounds, config.name, config.limit
    );
    let report = run(TracedStore::new(MemoryStore::new()), &config, plan).await?;
    println!("{}", report);

    if report.exceeded_limit() {
        bail!(
            "limit exceeded: {} concurrent holders with limit {}",
            report.max_concurrent,
            report.limit
        );
    }
    if report.gave_up > 0 {
        bail!(
            "{} acquisitions gave up after {} retries",
            report.gave_up,
            plan.retry.max_retries
        );
    }
    Ok(())
}

/// Drive `plan` against `store` and collect the outcome
pub async fn run<S: Store>(store: S, config: &SemaphoreConfig, plan: Plan) -> Result<Report> {
    let inside = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut tasks = Vec::with_capacity(plan.workers);
    for worker in 0..plan.workers {
        let mut sem = Semaphore::new(store.clone(), config.clone())?;
        let inside = Arc::clone(&inside);
        let peak = Arc::clone(&peak);

        tasks.push(tokio::spawn(async move {
            let mut tally = WorkerTally::default();
            for round in 0..plan.rounds {
                if !sem.acquire(plan.retry).await? {
                    tracing::warn!(worker, round, "gave up acquiring");
                    tally.gave_up += 1;
                    continue;
                }
                tally.acquired += 1;

                let now_inside = inside.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now_inside, Ordering::SeqCst);

                tokio::time::sleep(plan.hold / 2).await;
                let held = sem.refresh().await?;
                if held {
                    tokio::time::sleep(plan.hold / 2).await;
                } else {
                    tracing::warn!(worker, round, "slot lost during hold");
                    tally.lost += 1;
                }

                inside.fetch_sub(1, Ordering::SeqCst);
                sem.release().await?;
            }
            Ok::<_, fairsem_core::StoreError>(tally)
        }));
    }

    let mut report = Report {
        limit: config.limit,
        ..Default::default()
    };
    for task in tasks {
        let tally = task.await??;
        report.acquired += tally.acquired;
        report.gave_up += tally.gave_up;
        report.lost += tally.lost;
    }
    report.max_concurrent = peak.load(Ordering::SeqCst);
    report.leftover = Semaphore::new(store, config.clone())?
        .ledger()
        .occupancy()
        .await?;

    Ok(report)
}

#[cfg(test)]
#[path = "simulate_tests.rs"]
mod tests;
