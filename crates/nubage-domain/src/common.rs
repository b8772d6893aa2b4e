//! Small value types shared across the ledger model.

use std::fmt;

use uuid::Uuid;

/// Session-scoped identifier for a ledger entry.
///
/// Identifiers are never persisted; every load assigns fresh ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sign classification of an amount. Zero counts as positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn of(amount: f64) -> Self {
        if amount < 0.0 {
            Sign::Negative
        } else {
            Sign::Positive
        }
    }

    pub fn is_negative(self) -> bool {
        matches!(self, Sign::Negative)
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sign::Positive => "positive",
            Sign::Negative => "negative",
        };
        f.write_str(label)
    }
}
