// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Distributed counting semaphore over a shared store
//!
//! This module provides:
//! - **Lock** - Short-lived admission lock with owner-checked release
//! - **FairnessLedger** - Counter-ordered admission, eviction, and refresh
//! - **Semaphore** - Client handle composing the two

pub mod config;
pub mod keys;
pub mod ledger;
pub mod lock;
pub mod semaphore;

pub use config::{ConfigError, SemaphoreConfig};
pub use keys::SemaphoreKeys;
pub use ledger::{Admission, FairnessLedger, Refresh};
pub use lock::{Lock, LockRelease, LockToken};
pub use semaphore::{AcquireOptions, Semaphore};
