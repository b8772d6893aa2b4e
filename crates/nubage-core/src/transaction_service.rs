use nubage_domain::{format_amount, parse_amount, Direction, Period, Transaction};

use crate::{
    category_service::{CategoryChoice, CategoryRegistry},
    error::ValidationError,
};

/// Unvalidated contents of the input form.
///
/// Produced by [`crate::LedgerController::begin_edit`] to repopulate the form
/// and consumed by [`crate::LedgerController::add_transaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub title: String,
    pub value: String,
    pub period: String,
    pub category: CategoryChoice,
    /// When set, the sign of `value` is forced to match.
    pub direction: Option<Direction>,
}

impl Default for TransactionDraft {
    /// Blank form with the first period preselected.
    fn default() -> Self {
        Self {
            title: String::new(),
            value: String::new(),
            period: Period::default().label().to_string(),
            category: CategoryChoice::default(),
            direction: None,
        }
    }
}

impl TransactionDraft {
    pub fn new(
        title: impl Into<String>,
        value: impl Into<String>,
        period: Period,
        category: CategoryChoice,
    ) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            period: period.label().to_string(),
            category,
            direction: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Form contents that would recreate `transaction` unchanged.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            title: transaction.title().to_string(),
            value: transaction.value().to_string(),
            period: transaction.period_label().to_string(),
            category: CategoryChoice::from_label(transaction.category()),
            direction: None,
        }
    }
}

pub struct TransactionService;

impl TransactionService {
    /// Validates a draft and builds the transaction it describes.
    ///
    /// The registry is only touched once every other field has passed, so a
    /// rejected draft never leaves a half-registered category behind.
    pub fn build(
        draft: &TransactionDraft,
        categories: &mut CategoryRegistry,
    ) -> Result<Transaction, ValidationError> {
        if draft.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        let value_text = draft.value.trim();
        if value_text.is_empty() {
            return Err(ValidationError::EmptyField("value"));
        }
        let amount = parse_amount(value_text)
            .map_err(|_| ValidationError::InvalidValue(draft.value.clone()))?;
        let period_text = draft.period.trim();
        if period_text.is_empty() {
            return Err(ValidationError::EmptyField("period"));
        }
        let period: Period = period_text
            .parse()
            .map_err(|_| ValidationError::UnknownPeriod(draft.period.clone()))?;

        let value = match draft.direction {
            Some(direction) => format_amount(direction.apply(amount)),
            None => value_text.to_string(),
        };
        let category = categories.resolve(&draft.category)?;

        Ok(Transaction::new(draft.title.clone(), value, period, category))
    }
}
