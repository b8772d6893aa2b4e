//! The in-memory ledger: an ordered list of transactions with session ids.

use serde::{Deserialize, Serialize};

use crate::{
    common::{Sign, TransactionId},
    transaction::Transaction,
};

/// A transaction paired with the identifier it holds for this session.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub id: TransactionId,
    pub transaction: Transaction,
}

impl LedgerEntry {
    pub fn new(transaction: Transaction) -> Self {
        Self {
            id: TransactionId::new(),
            transaction,
        }
    }
}

/// Ordered collection of transactions.
///
/// Serializes as a bare JSON array of transactions. Equality compares the
/// transactions field by field and ignores the session identifiers, so a
/// ledger equals its own reloaded copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Transaction>", into = "Vec<Transaction>")]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter().map(|entry| &entry.transaction)
    }

    /// Appends a transaction and returns its new identifier.
    pub fn push(&mut self, transaction: Transaction) -> TransactionId {
        let entry = LedgerEntry::new(transaction);
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.transaction)
    }

    pub fn position(&self, id: TransactionId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub fn id_at(&self, index: usize) -> Option<TransactionId> {
        self.entries.get(index).map(|entry| entry.id)
    }

    pub fn remove(&mut self, id: TransactionId) -> Option<Transaction> {
        let index = self.position(id)?;
        Some(self.entries.remove(index).transaction)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<LedgerEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in presentation order: incomes first, then expenses, then
    /// entries whose value does not parse. Ties keep insertion order.
    pub fn display_order(&self) -> Vec<&LedgerEntry> {
        let mut ordered: Vec<&LedgerEntry> = self.entries.iter().collect();
        ordered.sort_by_key(|entry| match entry.transaction.sign() {
            Some(Sign::Positive) => 0u8,
            Some(Sign::Negative) => 1,
            None => 2,
        });
        ordered
    }
}

impl PartialEq for Ledger {
    fn eq(&self, other: &Self) -> bool {
        self.transactions().eq(other.transactions())
    }
}

impl From<Vec<Transaction>> for Ledger {
    fn from(transactions: Vec<Transaction>) -> Self {
        Self {
            entries: transactions.into_iter().map(LedgerEntry::new).collect(),
        }
    }
}

impl From<Ledger> for Vec<Transaction> {
    fn from(ledger: Ledger) -> Self {
        ledger
            .entries
            .into_iter()
            .map(|entry| entry.transaction)
            .collect()
    }
}

impl FromIterator<Transaction> for Ledger {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}
