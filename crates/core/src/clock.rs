// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling
//!
//! Ledger timestamps are whole epoch seconds, the resolution shared by every
//! process that scores entries in the Semaphore Set.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A clock that provides the current wall-clock time in epoch seconds
pub trait Clock: Clone + Send + Sync + 'static {
    fn epoch_secs(&self) -> u64;
}

/// Real system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_secs(&self) -> u64 {
        // A clock set before 1970 reads as the epoch itself
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone, Debug)]
pub struct FakeClock {
    current: Arc<AtomicU64>,
}

impl FakeClock {
    /// Arbitrary fixed starting point, well past the epoch so that
    /// `now - timeout` never underflows in tests
    pub const START: u64 = 1_700_000_000;

    pub fn new() -> Self {
        Self::at(Self::START)
    }

    pub fn at(epoch_secs: u64) -> Self {
        Self {
            current: Arc::new(AtomicU64::new(epoch_secs)),
        }
    }

    /// Advance the clock by the given duration (sub-second parts are dropped)
    pub fn advance(&self, duration: Duration) {
        self.current.fetch_add(duration.as_secs(), Ordering::SeqCst);
    }

    /// Set the clock to a specific epoch second
    pub fn set(&self, epoch_secs: u64) {
        self.current.store(epoch_secs, Ordering::SeqCst);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn epoch_secs(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
