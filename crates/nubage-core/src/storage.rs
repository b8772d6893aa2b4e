use std::path::{Path, PathBuf};

use nubage_domain::Ledger;

use crate::error::PersistError;

/// Result of a save request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The ledger was written to the returned path (suffix normalised).
    Saved(PathBuf),
    /// The ledger was empty; nothing was written.
    NothingToSave,
}

/// Abstraction over persistence backends capable of storing ledgers.
///
/// Implementations report failures to the caller and never interact with
/// the user themselves.
pub trait LedgerStorage: Send + Sync {
    fn save_ledger(&self, ledger: &Ledger, path: &Path) -> Result<SaveOutcome, PersistError>;
    fn load_ledger(&self, path: &Path) -> Result<Ledger, PersistError>;

    /// The location a caller-supplied path refers to for this backend.
    fn resolve(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// Detects hand-edited anomalies that a load accepts as-is.
pub fn ledger_warnings(ledger: &Ledger) -> Vec<String> {
    let mut warnings = Vec::new();
    for (index, transaction) in ledger.transactions().enumerate() {
        if let Some(field) = transaction.first_empty_field() {
            warnings.push(format!("entry {} has an empty {}", index, field));
        }
        if transaction.amount().is_err() {
            warnings.push(format!(
                "entry {} has non-numeric value `{}`",
                index,
                transaction.value()
            ));
        }
        if transaction.period().is_err() {
            warnings.push(format!(
                "entry {} has unrecognized period `{}`",
                index,
                transaction.period_label()
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use nubage_domain::{Period, Transaction};

    #[test]
    fn clean_ledger_has_no_warnings() {
        let ledger: Ledger = vec![Transaction::new("Rent", "-1200.0", Period::Month, "Housing")].into();
        assert!(ledger_warnings(&ledger).is_empty());
    }

    #[test]
    fn reports_each_anomaly() {
        let ledger: Ledger = vec![
            Transaction::from_parts("", "12", "Month", "Misc"),
            Transaction::from_parts("Odd", "x", "Fortnight", "Misc"),
        ]
        .into();
        let warnings = ledger_warnings(&ledger);
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("empty title"));
        assert!(warnings[1].contains("non-numeric"));
        assert!(warnings[2].contains("Fortnight"));
    }
}
