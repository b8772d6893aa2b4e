//! nubage-storage-json
//!
//! Filesystem persistence for ledgers as pretty-printed UTF-8 JSON arrays.

use std::{
    ffi::OsString,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use nubage_core::{LedgerStorage, PersistError, SaveOutcome};
use nubage_domain::{Ledger, Transaction};
use tracing::{debug, info};

pub const LEDGER_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const UTF8_BOM: char = '\u{feff}';

/// JSON-file backed [`LedgerStorage`].
///
/// Relative paths are resolved against the base directory when one is set.
#[derive(Debug, Clone, Default)]
pub struct JsonLedgerStorage {
    base_dir: Option<PathBuf>,
}

impl JsonLedgerStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }
}

impl LedgerStorage for JsonLedgerStorage {
    fn save_ledger(&self, ledger: &Ledger, path: &Path) -> Result<SaveOutcome, PersistError> {
        if ledger.is_empty() {
            debug!("empty ledger, nothing written");
            return Ok(SaveOutcome::NothingToSave);
        }
        let target = ensure_json_suffix(&self.resolve(path));
        save_ledger_to_path(ledger, &target)?;
        Ok(SaveOutcome::Saved(target))
    }

    fn load_ledger(&self, path: &Path) -> Result<Ledger, PersistError> {
        load_ledger_from_path(&self.resolve(path))
    }

    /// Relative paths land under the base directory when one is set.
    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// True when the path text literally ends in `.json`.
pub fn has_json_suffix(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(&format!(".{}", LEDGER_EXTENSION))
}

/// Appends `.json` unless the path already ends with it.
pub fn ensure_json_suffix(path: &Path) -> PathBuf {
    if has_json_suffix(path) {
        return path.to_path_buf();
    }
    let mut raw = OsString::from(path.as_os_str());
    raw.push(format!(".{}", LEDGER_EXTENSION));
    PathBuf::from(raw)
}

/// Writes the ledger to exactly `path`, replacing any existing file atomically.
///
/// The document is staged next to the target and renamed over it, so a
/// failed write leaves the previous file intact.
pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<(), PersistError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serialize_ledger(ledger)?;
    let tmp = tmp_path(path);
    if let Err(err) = write_atomic(&tmp, &json) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    info!(path = %path.display(), entries = ledger.len(), "ledger written");
    Ok(())
}

/// Reads a ledger document. Only `.json` paths are accepted.
pub fn load_ledger_from_path(path: &Path) -> Result<Ledger, PersistError> {
    if !has_json_suffix(path) {
        return Err(PersistError::InvalidFormat(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|err| corrupted(path, err))?;
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(&text);
    let transactions: Vec<Transaction> =
        serde_json::from_str(text).map_err(|err| corrupted(path, err))?;
    info!(path = %path.display(), entries = transactions.len(), "ledger read");
    Ok(Ledger::from(transactions))
}

/// Pretty-printed document followed by a trailing newline.
pub fn serialize_ledger(ledger: &Ledger) -> Result<String, PersistError> {
    let mut json = serde_json::to_string_pretty(ledger).map_err(|err| {
        PersistError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })?;
    json.push('\n');
    Ok(json)
}

fn corrupted(path: &Path, err: impl std::fmt::Display) -> PersistError {
    PersistError::Corrupted {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut raw = OsString::from(path.as_os_str());
    raw.push(format!(".{}", TMP_SUFFIX));
    PathBuf::from(raw)
}

fn write_atomic(path: &Path, data: &str) -> Result<(), PersistError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}
