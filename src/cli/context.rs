//! Shell state, error types and dispatch.

use std::{
    env, io,
    path::{Path, PathBuf},
};

use dialoguer::{theme::ColorfulTheme, Confirm};
use nubage_config::{Config, ConfigError, ConfigManager};
use nubage_core::{CoreError, LedgerChange, LedgerController, LedgerSnapshot, TransactionDraft};
use nubage_domain::TransactionId;
use nubage_storage_json::JsonLedgerStorage;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use super::commands::{self, CommandEntry, CommandRegistry};
use super::output::{self, OutputPreferences};
use super::render;

/// Overrides the directory holding `config.json`.
pub const HOME_ENV: &str = "NUBAGE_HOME";
/// Switches the shell to line-by-line stdin mode.
pub const SCRIPT_ENV: &str = "NUBAGE_CLI_SCRIPT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub controller: LedgerController,
    pub config: Config,
    pub config_manager: ConfigManager,
    /// Contents of the input form; filled by `edit`, consumed by `add`.
    pub form: TransactionDraft,
    pub theme: ColorfulTheme,
    pub running: bool,
    pub(crate) registry: CommandRegistry,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(config_base_dir())?;
        let config = config_manager.load()?;

        let color_enabled = config.color_enabled && mode == CliMode::Interactive;
        if !color_enabled {
            colored::control::set_override(false);
        }
        output::set_preferences(OutputPreferences { color_enabled });

        let storage = JsonLedgerStorage::with_base_dir(config.resolve_default_ledger_dir());
        let mut controller = LedgerController::new(Box::new(storage));
        controller.subscribe(announce_change);

        let mut context = Self {
            mode,
            controller,
            config,
            config_manager,
            form: TransactionDraft::default(),
            theme: ColorfulTheme::default(),
            running: true,
            registry: CommandRegistry::new(commands::definitions()),
        };
        context.auto_load_last();
        Ok(context)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn prompt(&self) -> String {
        let name = self
            .controller
            .current_path()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());
        let marker = if self.controller.has_pending_changes() {
            "*"
        } else {
            ""
        };
        format!("nubage [{name}{marker}]> ")
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|entry| entry.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, raw: &str) {
        let needle = raw.to_lowercase();
        let suggestion = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .filter(|(distance, _)| *distance <= 2)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name);
        match suggestion {
            Some(name) => output::warning(format!(
                "Unknown command `{raw}`. Did you mean `{name}`?"
            )),
            None => output::warning(format!(
                "Unknown command `{raw}`. Type `help` to list commands."
            )),
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }

    /// Asks before an action that would drop unsaved changes.
    ///
    /// Script mode never prompts.
    pub(crate) fn confirm_discard(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script
            || !self.controller.has_pending_changes()
            || !self.config.confirm_exit_with_pending_changes
        {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        self.confirm_discard("You have unsaved changes. Exit anyway?")
            .map_err(|err| match err {
                CommandError::Dialoguer(err) => CliError::Dialoguer(err),
                other => CliError::Io(io::Error::new(io::ErrorKind::Other, other.to_string())),
            })
    }

    /// Maps a 1-based row of the `list` output onto the entry it shows.
    pub(crate) fn row_id(&self, row: usize) -> Option<TransactionId> {
        let order = self.controller.ledger().display_order();
        row.checked_sub(1)
            .and_then(|index| order.get(index))
            .map(|entry| entry.id)
    }

    pub(crate) fn remember_ledger(&mut self, path: &Path) -> CommandResult {
        self.config.last_opened_ledger = Some(path.to_path_buf());
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    fn auto_load_last(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        let Some(path) = self.config.last_opened_ledger.clone() else {
            return;
        };
        match self.controller.load_ledger(&path) {
            Ok(report) => {
                render::load_report(&report);
                output::success(format!(
                    "Automatically loaded last ledger `{}`.",
                    path.display()
                ));
            }
            Err(err) => output::warning(format!(
                "Could not reopen `{}`: {err}",
                path.display()
            )),
        }
    }
}

fn config_base_dir() -> PathBuf {
    if let Some(home) = env::var_os(HOME_ENV) {
        return PathBuf::from(home);
    }
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nubage")
}

/// Re-renders the projections after every change that affects them.
fn announce_change(change: &LedgerChange, snapshot: &LedgerSnapshot) {
    match change {
        LedgerChange::Added(_)
        | LedgerChange::Removed(_)
        | LedgerChange::Loaded(_)
        | LedgerChange::Cleared => render::totals(snapshot.aggregation.as_ref()),
        LedgerChange::Saved(_) | LedgerChange::CategoryAdded(_) => {}
    }
}
