// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Many handles racing on one shared store
//!
//! Checks the bounded-concurrency invariant both under real task
//! concurrency and over random operation sequences with simulated time.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use fairsem_core::{
    AcquireOptions, FakeClock, MemoryStore, Semaphore, SemaphoreConfig, SequentialIdGen, Store,
    SystemClock, UuidIdGen,
};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_holders_never_exceed_limit() {
    const LIMIT: u32 = 3;
    const WORKERS: usize = 12;
    const ROUNDS: usize = 3;

    let store = MemoryStore::new();
    let inside = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let entries = Arc::new(AtomicUsize::new(0));

    let config = SemaphoreConfig::new("sim")
        .with_limit(LIMIT)
        .with_timeout(Duration::from_secs(50));

    let mut tasks = Vec::new();
    for _ in 0..WORKERS {
        let mut sem =
            Semaphore::with_capabilities(store.clone(), config.clone(), SystemClock, UuidIdGen)
                .unwrap();
        let inside = Arc::clone(&inside);
        let peak = Arc::clone(&peak);
        let entries = Arc::clone(&entries);

        tasks.push(tokio::spawn(async move {
            for _ in 0..ROUNDS {
                let acquired = sem
                    .acquire(AcquireOptions::retry(Duration::from_millis(2), 10_000))
                    .await
                    .unwrap();
                assert!(acquired);

                let now_inside = inside.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now_inside, Ordering::SeqCst);
                entries.fetch_add(1, Ordering::SeqCst);

                tokio::time::sleep(Duration::from_millis(3)).await;

                inside.fetch_sub(1, Ordering::SeqCst);
                sem.release().await.unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert!(peak.load(Ordering::SeqCst) <= LIMIT as usize);
    assert_eq!(entries.load(Ordering::SeqCst), WORKERS * ROUNDS);

    // Everyone released: nothing left behind but the counter
    assert!(store.members("sim").unwrap().is_empty());
    assert!(store.members("sim:owner").unwrap().is_empty());
    let counter: usize = store
        .get("sim:counter")
        .await
        .unwrap()
        .unwrap()
        .parse()
        .unwrap();
    assert!(counter >= WORKERS * ROUNDS);
}

#[derive(Clone, Debug)]
enum Op {
    Acquire(usize),
    Release(usize),
    Refresh(usize),
    Advance(u64),
}

fn op_strategy(handles: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..handles).prop_map(Op::Acquire),
        2 => (0..handles).prop_map(Op::Release),
        2 => (0..handles).prop_map(Op::Refresh),
        1 => (1..8u64).prop_map(Op::Advance),
    ]
}

/// Held handles whose entries are still in the ledger, with their ranks
fn live_ranks(
    store: &MemoryStore,
    handles: &[Semaphore<MemoryStore, FakeClock, SequentialIdGen>],
) -> Vec<usize> {
    let owners = store.members("prop:owner").unwrap();
    handles
        .iter()
        .filter_map(|h| h.identifier())
        .filter_map(|id| owners.iter().position(|(m, _)| m == id))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn live_holders_stay_within_limit(
        limit in 1..4u32,
        ops in proptest::collection::vec(op_strategy(6), 1..60),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let store = MemoryStore::new();
            let clock = FakeClock::new();
            let ids = SequentialIdGen::new("h");
            let config = SemaphoreConfig::new("prop")
                .with_limit(limit)
                .with_timeout(Duration::from_secs(10));

            let mut handles: Vec<_> = (0..6)
                .map(|_| {
                    Semaphore::with_capabilities(
                        store.clone(),
                        config.clone(),
                        clock.clone(),
                        ids.clone(),
                    )
                    .unwrap()
                })
                .collect();

            for op in ops {
                match op {
                    Op::Acquire(i) => {
                        handles[i].try_acquire().await.unwrap();
                    }
                    Op::Release(i) => handles[i].release().await.unwrap(),
                    Op::Refresh(i) => {
                        handles[i].refresh().await.unwrap();
                    }
                    Op::Advance(secs) => clock.advance(Duration::from_secs(secs)),
                }

                let ranks = live_ranks(&store, &handles);
                prop_assert!(ranks.len() <= limit as usize);
                prop_assert!(ranks.iter().all(|r| *r < limit as usize));
            }
            Ok(())
        })?;
    }
}
