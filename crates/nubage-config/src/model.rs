use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const LEDGER_DIR_NAME: &str = "Nubage";

/// Preferences read by the shell. Missing keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory relative ledger paths resolve against. Defaults to `~/Documents/Nubage`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ledger_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_ledger: Option<PathBuf>,
    #[serde(default = "Config::default_color_enabled")]
    pub color_enabled: bool,
    #[serde(default = "Config::default_confirm_exit")]
    pub confirm_exit_with_pending_changes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ledger_dir: None,
            last_opened_ledger: None,
            color_enabled: Self::default_color_enabled(),
            confirm_exit_with_pending_changes: Self::default_confirm_exit(),
        }
    }
}

impl Config {
    pub fn default_color_enabled() -> bool {
        true
    }

    pub fn default_confirm_exit() -> bool {
        true
    }

    pub fn resolve_default_ledger_dir(&self) -> PathBuf {
        if let Some(path) = &self.default_ledger_dir {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join(LEDGER_DIR_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_dir_wins() {
        let config = Config {
            default_ledger_dir: Some(PathBuf::from("/srv/ledgers")),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_default_ledger_dir(),
            PathBuf::from("/srv/ledgers")
        );
    }

    #[test]
    fn fallback_dir_ends_in_app_folder() {
        let dir = Config::default().resolve_default_ledger_dir();
        assert!(dir.ends_with(LEDGER_DIR_NAME));
    }
}
