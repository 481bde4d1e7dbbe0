// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fairsem-core: fair distributed counting semaphore
//!
//! This crate provides:
//! - Injected capabilities for time and token generation
//! - The store primitives contract plus an in-process backend
//! - The lock, fairness ledger, and semaphore handle built on top

pub mod clock;
pub mod id;

pub mod coordination;
pub mod store;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};

pub use coordination::{
    AcquireOptions, Admission, ConfigError, FairnessLedger, Lock, LockRelease, LockToken,
    Refresh, Semaphore, SemaphoreConfig, SemaphoreKeys,
};
pub use store::{Command, MemoryStore, Reply, Store, StoreError, Watched};
