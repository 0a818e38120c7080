//! Error types for the core library.
//!
//! The taxonomy here is deliberately flat: every fallible ring operation
//! returns one of these variants and never retries or swallows an error
//! internally (the bounded retry inside `join_random` lives in the
//! `replication` crate, above this taxonomy, not inside it).

use thiserror::Error;

use crate::identifier::Identifier;

/// Result type alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while operating on a ring.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A node identifier was outside `[0, 2^m)` for the ring's configured `m`.
    #[error("identifier {0} is out of range for a {1}-bit ring")]
    IdentifierOutOfRange(Identifier, u32),

    /// `join` was called with an identifier already present in the ring.
    #[error("node {0} is already present in the ring")]
    DuplicateNode(Identifier),

    /// `leave` targeted an identifier that is not present in the ring.
    #[error("node {0} is not present in the ring")]
    UnknownNode(Identifier),

    /// An operation that requires at least one node was attempted on an
    /// empty ring.
    #[error("the ring has no nodes")]
    RingEmpty,

    /// `join_random` could not find a free identifier within its attempt
    /// budget.
    #[error("join_random exhausted {0} attempts without finding a free identifier")]
    CollisionExhausted(u32),
}
