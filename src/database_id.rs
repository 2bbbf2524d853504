//! Database ID type definition.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The row ID of a transaction.
///
/// This helps disambiguate transaction IDs from other types of IDs, leading to better compile
/// time errors, and more flexible generics that can have distinct implementations for multiple
/// ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct TransactionId(i64);

impl TransactionId {
    /// Create a new transaction ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the transaction ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
