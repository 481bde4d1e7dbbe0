// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashSet;

#[test]
fn uuid_tokens_are_distinct() {
    let ids = UuidIdGen;
    let tokens: HashSet<String> = (0..64).map(|_| ids.next()).collect();
    assert_eq!(tokens.len(), 64);
    assert!(tokens.iter().all(|t| t.len() == 36));
}

#[test]
fn sequential_tokens_are_predictable() {
    let ids = SequentialIdGen::new("lock");
    assert_eq!(ids.next(), "lock-1");
    assert_eq!(ids.next(), "lock-2");
}

#[test]
fn sequential_clones_share_a_counter() {
    let a = SequentialIdGen::new("shared");
    let b = a.clone();
    assert_eq!(a.next(), "shared-1");
    assert_eq!(b.next(), "shared-2");
    assert_eq!(a.next(), "shared-3");
}
