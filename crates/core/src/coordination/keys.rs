// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store key layout for a named semaphore
//!
//! These names are shared with existing deployments and must not change.

/// Every key a semaphore named `name` touches
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SemaphoreKeys {
    /// Semaphore Set: identifier -> last acquire/refresh timestamp
    pub set: String,
    /// Owner Set: identifier -> counter value at acquisition
    pub owner: String,
    /// Monotonic attempt counter
    pub counter: String,
    /// Mutual-exclusion lock guarding admission
    pub lock: String,
}

impl SemaphoreKeys {
    pub fn new(name: &str) -> Self {
        Self {
            set: name.to_string(),
            owner: format!("{}:owner", name),
            counter: format!("{}:counter", name),
            lock: format!("lock:{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_deployed_naming() {
        let keys = SemaphoreKeys::new("test1");
        assert_eq!(keys.set, "test1");
        assert_eq!(keys.owner, "test1:owner");
        assert_eq!(keys.counter, "test1:counter");
        assert_eq!(keys.lock, "lock:test1");
    }
}
