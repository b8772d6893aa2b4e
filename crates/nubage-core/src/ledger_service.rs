//! Ledger controller: owns the in-memory ledger and everything derived from it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use nubage_domain::{Ledger, LedgerEntry, TransactionId};
use tracing::{debug, info, warn};

use crate::{
    aggregation_service::{AggregationResult, AggregationService},
    category_service::CategoryRegistry,
    error::{CalculationError, CoreError},
    storage::{ledger_warnings, LedgerStorage, SaveOutcome},
    time::{Clock, SystemClock},
    transaction_service::{TransactionDraft, TransactionService},
};

/// Whether the ledger holds any entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contents {
    Empty,
    Populated,
}

/// Whether the ledger matches what was last loaded or saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Clean,
    Dirty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerStatus {
    pub contents: Contents,
    pub sync: SyncState,
    pub path: Option<PathBuf>,
    pub last_saved_at: Option<DateTime<Utc>>,
}

/// Notification sent to subscribers after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerChange {
    Cleared,
    Added(TransactionId),
    Removed(TransactionId),
    Loaded(PathBuf),
    Saved(PathBuf),
    CategoryAdded(String),
}

/// Consistent copy of the controller state, taken after a mutation completed.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    pub entries: Vec<LedgerEntry>,
    pub aggregation: Result<AggregationResult, CalculationError>,
    pub categories: CategoryRegistry,
    pub status: LedgerStatus,
}

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub path: PathBuf,
    pub transactions: usize,
    pub warnings: Vec<String>,
}

pub type ChangeListener = Box<dyn FnMut(&LedgerChange, &LedgerSnapshot)>;

/// Facade that coordinates ledger state, derived data, and persistence.
///
/// Every mutation ends in [`LedgerController::recompute`], which refreshes the
/// aggregation and the category registry before listeners are notified.
pub struct LedgerController {
    ledger: Ledger,
    categories: CategoryRegistry,
    aggregation: Result<AggregationResult, CalculationError>,
    current_path: Option<PathBuf>,
    dirty: bool,
    last_saved_at: Option<DateTime<Utc>>,
    storage: Box<dyn LedgerStorage>,
    clock: Box<dyn Clock>,
    listeners: Vec<ChangeListener>,
}

impl LedgerController {
    pub fn new(storage: Box<dyn LedgerStorage>) -> Self {
        Self::with_clock(storage, Box::new(SystemClock))
    }

    pub fn with_clock(storage: Box<dyn LedgerStorage>, clock: Box<dyn Clock>) -> Self {
        Self {
            ledger: Ledger::new(),
            categories: CategoryRegistry::new(),
            aggregation: Ok(AggregationResult::zero()),
            current_path: None,
            dirty: false,
            last_saved_at: None,
            storage,
            clock,
            listeners: Vec::new(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn aggregation(&self) -> Result<&AggregationResult, &CalculationError> {
        self.aggregation.as_ref()
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn has_pending_changes(&self) -> bool {
        self.dirty
    }

    pub fn status(&self) -> LedgerStatus {
        LedgerStatus {
            contents: if self.ledger.is_empty() {
                Contents::Empty
            } else {
                Contents::Populated
            },
            sync: if self.dirty {
                SyncState::Dirty
            } else {
                SyncState::Clean
            },
            path: self.current_path.clone(),
            last_saved_at: self.last_saved_at,
        }
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            entries: self.ledger.entries().to_vec(),
            aggregation: self.aggregation.clone(),
            categories: self.categories.clone(),
            status: self.status(),
        }
    }

    /// Registers a listener called after every mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&LedgerChange, &LedgerSnapshot) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Starts an empty sheet and forgets the current file.
    pub fn new_ledger(&mut self) {
        self.ledger.clear();
        self.current_path = None;
        self.dirty = false;
        self.last_saved_at = None;
        self.categories = CategoryRegistry::new();
        info!("new ledger started");
        self.recompute();
        self.notify(LedgerChange::Cleared);
    }

    /// Validates the draft and appends the resulting transaction.
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<TransactionId, CoreError> {
        let transaction = TransactionService::build(&draft, &mut self.categories)?;
        let id = self.ledger.push(transaction);
        self.dirty = true;
        debug!(%id, "transaction added");
        self.recompute();
        self.notify(LedgerChange::Added(id));
        Ok(id)
    }

    /// Re-adds an entry taken out by [`LedgerController::begin_edit`].
    pub fn commit_edit(&mut self, draft: TransactionDraft) -> Result<TransactionId, CoreError> {
        self.add_transaction(draft)
    }

    /// Takes an entry out of the ledger and returns its fields for editing.
    pub fn begin_edit(&mut self, id: TransactionId) -> Option<TransactionDraft> {
        let index = self.ledger.position(id)?;
        self.take_at(index)
            .map(|entry| TransactionDraft::from_transaction(&entry.transaction))
    }

    pub fn begin_edit_at(&mut self, index: usize) -> Option<TransactionDraft> {
        self.take_at(index)
            .map(|entry| TransactionDraft::from_transaction(&entry.transaction))
    }

    /// Deletes the selected entry. No selection, or a stale one, is a no-op.
    pub fn delete_transaction(&mut self, selection: Option<TransactionId>) -> bool {
        let Some(index) = selection.and_then(|id| self.ledger.position(id)) else {
            return false;
        };
        self.take_at(index).is_some()
    }

    pub fn remove_at(&mut self, index: usize) -> bool {
        self.take_at(index).is_some()
    }

    /// Confirms free text typed after choosing "add a new category".
    pub fn choose_new_category(&mut self, label: &str) -> bool {
        let added = self.categories.add_custom(label);
        if added {
            self.recompute();
            self.notify(LedgerChange::CategoryAdded(label.trim().to_string()));
        }
        added
    }

    /// Replaces the whole ledger with the document at `path`.
    ///
    /// On failure the current ledger, path and state are left untouched.
    /// The recorded path is the one the storage resolved, as on save.
    pub fn load_ledger(&mut self, path: &Path) -> Result<LoadReport, CoreError> {
        let ledger = self.storage.load_ledger(path)?;
        let path = self.storage.resolve(path);
        let warnings = ledger_warnings(&ledger);
        for warning in &warnings {
            warn!(path = %path.display(), "{warning}");
        }
        self.ledger = ledger;
        self.categories = CategoryRegistry::derive(&self.ledger);
        self.current_path = Some(path.clone());
        self.dirty = false;
        info!(path = %path.display(), entries = self.ledger.len(), "ledger loaded");
        self.recompute();
        self.notify(LedgerChange::Loaded(path.clone()));
        Ok(LoadReport {
            path,
            transactions: self.ledger.len(),
            warnings,
        })
    }

    /// Writes the ledger to `path` and remembers the path that was written.
    pub fn save_ledger(&mut self, path: &Path) -> Result<SaveOutcome, CoreError> {
        if self.ledger.is_empty() {
            info!("nothing to save");
            return Ok(SaveOutcome::NothingToSave);
        }
        let outcome = self.storage.save_ledger(&self.ledger, path)?;
        if let SaveOutcome::Saved(written) = &outcome {
            self.current_path = Some(written.clone());
            self.dirty = false;
            self.last_saved_at = Some(self.clock.now());
            info!(path = %written.display(), entries = self.ledger.len(), "ledger saved");
            self.notify(LedgerChange::Saved(written.clone()));
        }
        Ok(outcome)
    }

    /// Saves to the file last loaded or saved.
    pub fn save(&mut self) -> Result<SaveOutcome, CoreError> {
        let path = self.current_path.clone().ok_or(CoreError::NoSaveTarget)?;
        self.save_ledger(&path)
    }

    /// Refreshes the aggregation and the category registry.
    pub fn recompute(&mut self) {
        self.aggregation = AggregationService::aggregate(&self.ledger);
        self.categories.absorb(&self.ledger);
    }

    fn take_at(&mut self, index: usize) -> Option<LedgerEntry> {
        let entry = self.ledger.remove_at(index)?;
        self.dirty = true;
        debug!(id = %entry.id, index, "transaction removed");
        self.recompute();
        self.notify(LedgerChange::Removed(entry.id));
        Some(entry)
    }

    fn notify(&mut self, change: LedgerChange) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in self.listeners.iter_mut() {
            listener(&change, &snapshot);
        }
    }
}
