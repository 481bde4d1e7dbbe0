// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store commands and their replies
//!
//! The command set mirrors the Redis primitives the coordination protocol is
//! built from. Any store that can execute these atomically, singly or as a
//! grouped transaction, satisfies the contract.

use super::StoreError;
use std::time::Duration;

/// A single store primitive
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Upsert `member -> score`. Replies `Int(1)` if newly inserted, `Int(0)` if updated.
    ZAdd {
        key: String,
        member: String,
        score: f64,
    },
    /// Remove a member. Replies the number of members removed.
    ZRem { key: String, member: String },
    /// 0-indexed ascending rank of a member, `Nil` if absent.
    ZRank { key: String, member: String },
    /// Remove every member with score in `-inf ..= max`. Replies the count removed.
    ZRemRangeByScore { key: String, max: f64 },
    /// Store the intersection of `sources` into `dest`, summing weighted scores.
    /// Replies the cardinality of the result.
    ZInterStore {
        dest: String,
        sources: Vec<(String, f64)>,
    },
    /// Cardinality of a sorted set (0 if absent).
    ZCard { key: String },
    /// Atomic increment. Replies the new value.
    Incr { key: String },
    /// Set only if absent, with optional expiry. Replies `Bool`.
    SetNx {
        key: String,
        value: String,
        ttl: Option<Duration>,
    },
    /// Plain read. Replies `Bulk` or `Nil`.
    Get { key: String },
    /// Delete a key. Replies the number of keys removed.
    Del { key: String },
}

impl Command {
    pub fn zadd(key: impl Into<String>, member: impl Into<String>, score: f64) -> Self {
        Command::ZAdd {
            key: key.into(),
            member: member.into(),
            score,
        }
    }

    pub fn zrem(key: impl Into<String>, member: impl Into<String>) -> Self {
        Command::ZRem {
            key: key.into(),
            member: member.into(),
        }
    }

    pub fn zrank(key: impl Into<String>, member: impl Into<String>) -> Self {
        Command::ZRank {
            key: key.into(),
            member: member.into(),
        }
    }

    pub fn zremrangebyscore(key: impl Into<String>, max: f64) -> Self {
        Command::ZRemRangeByScore {
            key: key.into(),
            max,
        }
    }

    pub fn zinterstore(dest: impl Into<String>, sources: Vec<(String, f64)>) -> Self {
        Command::ZInterStore {
            dest: dest.into(),
            sources,
        }
    }

    pub fn zcard(key: impl Into<String>) -> Self {
        Command::ZCard { key: key.into() }
    }

    pub fn incr(key: impl Into<String>) -> Self {
        Command::Incr { key: key.into() }
    }

    pub fn setnx(key: impl Into<String>, value: impl Into<String>, ttl: Option<Duration>) -> Self {
        Command::SetNx {
            key: key.into(),
            value: value.into(),
            ttl,
        }
    }

    pub fn get(key: impl Into<String>) -> Self {
        Command::Get { key: key.into() }
    }

    pub fn del(key: impl Into<String>) -> Self {
        Command::Del { key: key.into() }
    }

    /// Wire name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::ZAdd { .. } => "ZADD",
            Command::ZRem { .. } => "ZREM",
            Command::ZRank { .. } => "ZRANK",
            Command::ZRemRangeByScore { .. } => "ZREMRANGEBYSCORE",
            Command::ZInterStore { .. } => "ZINTERSTORE",
            Command::ZCard { .. } => "ZCARD",
            Command::Incr { .. } => "INCR",
            Command::SetNx { .. } => "SETNX",
            Command::Get { .. } => "GET",
            Command::Del { .. } => "DEL",
        }
    }

    /// The key this command writes to (or reads, for read-only commands)
    pub fn key(&self) -> &str {
        match self {
            Command::ZAdd { key, .. }
            | Command::ZRem { key, .. }
            | Command::ZRank { key, .. }
            | Command::ZRemRangeByScore { key, .. }
            | Command::ZCard { key }
            | Command::Incr { key }
            | Command::SetNx { key, .. }
            | Command::Get { key }
            | Command::Del { key } => key,
            Command::ZInterStore { dest, .. } => dest,
        }
    }
}

/// Result of a single command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Nil,
    Bool(bool),
    Int(i64),
    Bulk(String),
}

impl Reply {
    pub fn into_int(self) -> Result<i64, StoreError> {
        match self {
            Reply::Int(n) => Ok(n),
            reply => Err(StoreError::UnexpectedReply {
                expected: "integer",
                reply,
            }),
        }
    }

    /// Truthiness: `Bool(b)`, or a positive `Int` count
    pub fn into_bool(self) -> Result<bool, StoreError> {
        match self {
            Reply::Bool(b) => Ok(b),
            Reply::Int(n) => Ok(n > 0),
            reply => Err(StoreError::UnexpectedReply {
                expected: "boolean",
                reply,
            }),
        }
    }

    pub fn into_rank(self) -> Result<Option<u64>, StoreError> {
        match self {
            Reply::Nil => Ok(None),
            Reply::Int(n) if n >= 0 => Ok(Some(n as u64)),
            reply => Err(StoreError::UnexpectedReply {
                expected: "rank",
                reply,
            }),
        }
    }

    pub fn into_value(self) -> Result<Option<String>, StoreError> {
        match self {
            Reply::Nil => Ok(None),
            Reply::Bulk(s) => Ok(Some(s)),
            reply => Err(StoreError::UnexpectedReply {
                expected: "bulk string",
                reply,
            }),
        }
    }
}
