//! Read-only views of controller state.

use chrono::Local;
use nubage_core::{
    AggregationResult, CalculationError, CategoryChoice, CategoryRegistry, Contents, LedgerStatus,
    LoadReport, SyncState, TransactionDraft,
};
use nubage_domain::{Direction, Ledger};

use super::output;

pub fn totals(aggregation: Result<&AggregationResult, &CalculationError>) {
    match aggregation {
        Ok(result) => {
            let figures = result.formatted();
            output::signed_line(
                format!(
                    "Hour: {}  Day: {}  Week: {}  Month: {}  Year: {}",
                    figures.hour, figures.day, figures.week, figures.month, figures.year
                ),
                Some(figures.sign),
            );
        }
        Err(err) => output::error(err),
    }
}

/// One numbered row per entry, incomes first.
pub fn ledger(ledger: &Ledger) {
    if ledger.is_empty() {
        output::info("The ledger is empty.");
        return;
    }
    output::section("Transactions");
    for (row, entry) in ledger.display_order().into_iter().enumerate() {
        let transaction = &entry.transaction;
        output::signed_line(
            format!(
                "{:>3}. {:<20} {:>12} {:<9} {}",
                row + 1,
                transaction.title(),
                transaction.value(),
                transaction.period_label(),
                transaction.category()
            ),
            transaction.sign(),
        );
    }
}

pub fn form(draft: &TransactionDraft) {
    output::section("Form");
    output::info(format!("  title    : {}", draft.title));
    output::info(format!("  value    : {}", draft.value));
    output::info(format!("  period   : {}", draft.period));
    let category = match &draft.category {
        CategoryChoice::NoneSelected => "(none selected)".to_string(),
        CategoryChoice::AddNew(text) => format!("{text} (new)"),
        CategoryChoice::Existing(label) => label.clone(),
    };
    output::info(format!("  category : {category}"));
    let direction = match draft.direction {
        Some(Direction::Income) => "income",
        Some(Direction::Expense) => "expense",
        None => "as typed",
    };
    output::info(format!("  sign     : {direction}"));
}

pub fn categories(registry: &CategoryRegistry) {
    output::section("Categories");
    for label in registry.labels() {
        let marker = if label == registry.active() { "*" } else { " " };
        output::info(format!(" {marker} {label}"));
    }
}

pub fn status(status: &LedgerStatus, entries: usize) {
    output::section("Status");
    let contents = match status.contents {
        Contents::Empty => "empty".to_string(),
        Contents::Populated => format!("{entries} entries"),
    };
    let sync = match status.sync {
        SyncState::Clean => "no unsaved changes",
        SyncState::Dirty => "unsaved changes",
    };
    output::info(format!("  ledger     : {contents}, {sync}"));
    match &status.path {
        Some(path) => output::info(format!("  file       : {}", path.display())),
        None => output::info("  file       : (none)"),
    }
    if let Some(saved_at) = status.last_saved_at {
        output::info(format!(
            "  last saved : {}",
            saved_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        ));
    }
}

pub fn load_report(report: &LoadReport) {
    output::success(format!(
        "Loaded {} transactions from `{}`.",
        report.transactions,
        report.path.display()
    ));
    for warning in &report.warnings {
        output::warning(warning);
    }
}
