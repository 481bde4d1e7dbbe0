// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store error types

use super::Reply;
use thiserror::Error;

/// Errors from store primitives
///
/// Only [`StoreError::Unavailable`] is expected in a healthy deployment; the
/// remaining variants mean the keyspace holds data this crate did not write.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("wrong type for key {key}: expected {expected}")]
    WrongType { key: String, expected: &'static str },
    #[error("unexpected reply, expected {expected}: {reply:?}")]
    UnexpectedReply { expected: &'static str, reply: Reply },
    #[error("increment would overflow key {0}")]
    Overflow(String),
    #[error("transaction returned no reply for {0}")]
    MissingReply(&'static str),
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}
