//! Domain model for a single ledger line.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    common::Sign,
    period::{Period, UnknownPeriod},
};

/// One titled, categorized, period-tagged signed amount.
///
/// All four fields are kept as text so hand-edited or legacy files survive a
/// load/save cycle untouched. Use [`Transaction::amount`] and
/// [`Transaction::period`] to read the typed values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transaction {
    title: String,
    value: String,
    period: String,
    category: String,
}

impl Transaction {
    pub fn new(
        title: impl Into<String>,
        value: impl Into<String>,
        period: Period,
        category: impl Into<String>,
    ) -> Self {
        Self::from_parts(title, value, period.label(), category)
    }

    /// Builds a transaction without interpreting any field.
    pub fn from_parts(
        title: impl Into<String>,
        value: impl Into<String>,
        period: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            period: period.into(),
            category: category.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The amount exactly as it was entered or loaded.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn period_label(&self) -> &str {
        &self.period
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Parses the stored value. Non-finite numbers are rejected.
    pub fn amount(&self) -> Result<f64, InvalidAmount> {
        parse_amount(&self.value)
    }

    pub fn period(&self) -> Result<Period, UnknownPeriod> {
        self.period.parse()
    }

    /// Sign of the parsed amount, `None` when the value does not parse.
    pub fn sign(&self) -> Option<Sign> {
        self.amount().ok().map(Sign::of)
    }

    /// Name of the first blank field, if any.
    pub fn first_empty_field(&self) -> Option<&'static str> {
        [
            ("title", &self.title),
            ("value", &self.value),
            ("period", &self.period),
            ("category", &self.category),
        ]
        .into_iter()
        .find(|(_, text)| text.trim().is_empty())
        .map(|(name, _)| name)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} per {} [{}]",
            self.title, self.value, self.period, self.category
        )
    }
}

/// Whether an amount entered on the form is money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Income,
    Expense,
}

impl Direction {
    /// Keeps the magnitude and forces the sign matching the direction.
    pub fn apply(self, amount: f64) -> f64 {
        match self {
            Direction::Income => amount.abs(),
            Direction::Expense => -amount.abs(),
        }
    }
}

/// The value text could not be read as a finite number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAmount(pub String);

impl fmt::Display for InvalidAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a valid amount", self.0)
    }
}

impl std::error::Error for InvalidAmount {}

/// Parses a signed decimal amount, tolerating surrounding whitespace.
pub fn parse_amount(text: &str) -> Result<f64, InvalidAmount> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| InvalidAmount(text.to_string()))
}

/// Renders an amount in the legacy text form: whole numbers keep a `.0`.
pub fn format_amount(amount: f64) -> String {
    let amount = if amount == 0.0 { 0.0 } else { amount };
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{:.1}", amount)
    } else {
        format!("{}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_parses_signed_text() {
        let rent = Transaction::new("Rent", "-1200.0", Period::Month, "Housing");
        assert_eq!(rent.amount(), Ok(-1200.0));
        assert_eq!(rent.sign(), Some(Sign::Negative));

        let padded = Transaction::new("Gift", " 25 ", Period::Year, "Misc");
        assert_eq!(padded.amount(), Ok(25.0));
        assert_eq!(padded.value(), " 25 ");
    }

    #[test]
    fn zero_amount_is_positive() {
        let txn = Transaction::new("Nothing", "0", Period::Day, "Misc");
        assert_eq!(txn.sign(), Some(Sign::Positive));
    }

    #[test]
    fn rejects_non_numeric_and_non_finite_values() {
        assert!(parse_amount("twelve").is_err());
        assert!(parse_amount("").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn unknown_period_is_reported_not_guessed() {
        let txn = Transaction::from_parts("Odd", "10", "Fortnight", "Misc");
        assert!(txn.period().is_err());
        assert_eq!(txn.period_label(), "Fortnight");
    }

    #[test]
    fn first_empty_field_reports_blank_text() {
        let txn = Transaction::from_parts("Coffee", "-3", "Day", "  ");
        assert_eq!(txn.first_empty_field(), Some("category"));
        let full = Transaction::new("Coffee", "-3", Period::Day, "Food");
        assert_eq!(full.first_empty_field(), None);
    }

    #[test]
    fn direction_forces_sign() {
        assert_eq!(Direction::Expense.apply(1200.0), -1200.0);
        assert_eq!(Direction::Expense.apply(-5.0), -5.0);
        assert_eq!(Direction::Income.apply(-5.0), 5.0);
    }

    #[test]
    fn format_amount_keeps_legacy_shape() {
        assert_eq!(format_amount(-1200.0), "-1200.0");
        assert_eq!(format_amount(12.5), "12.5");
        assert_eq!(format_amount(-0.0), "0.0");
    }

    #[test]
    fn serializes_four_string_fields_in_order() {
        let txn = Transaction::new("Salary", "3600.0", Period::Month, "Job");
        let json = serde_json::to_string(&txn).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Salary","value":"3600.0","period":"Month","category":"Job"}"#
        );
    }
}
