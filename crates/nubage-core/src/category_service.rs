//! Category registry backing the category picker of the input form.

use nubage_domain::Ledger;
use tracing::debug;

use crate::error::ValidationError;

/// Sentinel meaning "no category chosen". Also the fallback category.
pub const NONE_SELECTED: &str = "none selected";
/// Sentinel that opens the free-text entry for a brand-new category.
pub const ADD_NEW_CATEGORY: &str = "add a new category";

/// What the user picked in the category control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryChoice {
    NoneSelected,
    /// The "add a new category" sentinel together with the free text typed so far.
    AddNew(String),
    Existing(String),
}

impl CategoryChoice {
    /// Maps a raw picker label onto a choice, recognising both sentinels.
    pub fn from_label(label: &str) -> Self {
        match label {
            NONE_SELECTED => CategoryChoice::NoneSelected,
            ADD_NEW_CATEGORY => CategoryChoice::AddNew(String::new()),
            other => CategoryChoice::Existing(other.to_string()),
        }
    }
}

impl Default for CategoryChoice {
    fn default() -> Self {
        CategoryChoice::NoneSelected
    }
}

/// Ordered, duplicate-free list of category labels.
///
/// Always starts with [`NONE_SELECTED`] and [`ADD_NEW_CATEGORY`], followed by
/// the ledger's categories in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    labels: Vec<String>,
    active: usize,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self {
            labels: vec![NONE_SELECTED.to_string(), ADD_NEW_CATEGORY.to_string()],
            active: 0,
        }
    }

    /// Rebuilds the registry from the categories used in `ledger`.
    pub fn derive(ledger: &Ledger) -> Self {
        let mut registry = Self::new();
        registry.absorb(ledger);
        registry
    }

    /// Registers the ledger's categories that are not known yet.
    ///
    /// Labels whose last transaction was removed stay available, so an entry
    /// taken out for editing can be put back under its old category.
    pub fn absorb(&mut self, ledger: &Ledger) {
        for transaction in ledger.transactions() {
            self.insert(transaction.category());
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Categories a transaction may carry: every label except the
    /// "add a new category" sentinel.
    pub fn selectable(&self) -> impl Iterator<Item = &str> {
        self.labels
            .iter()
            .map(String::as_str)
            .filter(|label| *label != ADD_NEW_CATEGORY)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|existing| existing == label)
    }

    /// The label the picker should show as selected.
    pub fn active(&self) -> &str {
        &self.labels[self.active]
    }

    /// Selects an existing label. Returns `false` when the label is unknown.
    pub fn select(&mut self, label: &str) -> bool {
        match self.labels.iter().position(|existing| existing == label) {
            Some(index) => {
                self.active = index;
                true
            }
            None => false,
        }
    }

    /// Adds a free-text category if it is new and makes it the active label.
    ///
    /// Blank text is ignored and leaves the registry untouched.
    pub fn add_custom(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() {
            return false;
        }
        let added = self.insert(label);
        if added {
            debug!(category = label, "category added");
        }
        self.select(label);
        added
    }

    /// Turns a picker choice into the category stored on a transaction.
    ///
    /// The "add a new category" sentinel resolves to its free text, or to
    /// [`NONE_SELECTED`] when nothing was typed. Typing the sentinel label
    /// itself counts as typing nothing.
    pub fn resolve(&mut self, choice: &CategoryChoice) -> Result<String, ValidationError> {
        match choice {
            CategoryChoice::NoneSelected => Ok(NONE_SELECTED.to_string()),
            CategoryChoice::AddNew(text) => {
                let text = text.trim();
                if text.is_empty() || text == ADD_NEW_CATEGORY {
                    self.select(NONE_SELECTED);
                    Ok(NONE_SELECTED.to_string())
                } else {
                    self.add_custom(text);
                    Ok(text.to_string())
                }
            }
            CategoryChoice::Existing(label) => {
                if label.trim().is_empty() {
                    Err(ValidationError::EmptyField("category"))
                } else if label == ADD_NEW_CATEGORY {
                    Ok(NONE_SELECTED.to_string())
                } else if self.contains(label) {
                    Ok(label.clone())
                } else {
                    Err(ValidationError::UnknownCategory(label.clone()))
                }
            }
        }
    }

    fn insert(&mut self, label: &str) -> bool {
        if self.contains(label) {
            false
        } else {
            self.labels.push(label.to_string());
            true
        }
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nubage_domain::{Period, Transaction};

    fn ledger(categories: &[&str]) -> Ledger {
        categories
            .iter()
            .map(|category| Transaction::new("x", "1", Period::Year, *category))
            .collect()
    }

    #[test]
    fn starts_with_sentinels() {
        let registry = CategoryRegistry::derive(&Ledger::new());
        assert_eq!(registry.labels(), &[NONE_SELECTED, ADD_NEW_CATEGORY]);
        assert_eq!(registry.active(), NONE_SELECTED);
    }

    #[test]
    fn keeps_first_seen_order_without_duplicates() {
        let registry = CategoryRegistry::derive(&ledger(&["Job", "Housing", "Job", "Food"]));
        assert_eq!(
            registry.labels(),
            &[NONE_SELECTED, ADD_NEW_CATEGORY, "Job", "Housing", "Food"]
        );
    }

    #[test]
    fn literal_sentinel_categories_do_not_duplicate() {
        let registry = CategoryRegistry::derive(&ledger(&[NONE_SELECTED, "Job", ADD_NEW_CATEGORY]));
        assert_eq!(
            registry.labels(),
            &[NONE_SELECTED, ADD_NEW_CATEGORY, "Job"]
        );
    }

    #[test]
    fn add_custom_appends_once_and_activates() {
        let mut registry = CategoryRegistry::new();
        assert!(registry.add_custom("Travel"));
        assert!(!registry.add_custom("Travel"));
        assert_eq!(registry.labels().len(), 3);
        assert_eq!(registry.active(), "Travel");
        assert!(!registry.add_custom("   "));
    }

    #[test]
    fn add_new_sentinel_resolves_to_text_or_fallback() {
        let mut registry = CategoryRegistry::new();
        let resolved = registry
            .resolve(&CategoryChoice::AddNew(" Pets ".into()))
            .unwrap();
        assert_eq!(resolved, "Pets");
        assert!(registry.contains("Pets"));

        let fallback = registry.resolve(&CategoryChoice::AddNew(String::new())).unwrap();
        assert_eq!(fallback, NONE_SELECTED);
        assert_eq!(registry.active(), NONE_SELECTED);

        let literal = registry
            .resolve(&CategoryChoice::from_label(ADD_NEW_CATEGORY))
            .unwrap();
        assert_eq!(literal, NONE_SELECTED);
    }

    #[test]
    fn typed_sentinel_label_falls_back_to_none_selected() {
        let mut registry = CategoryRegistry::new();
        registry.add_custom("Travel");

        let resolved = registry
            .resolve(&CategoryChoice::AddNew(format!("  {ADD_NEW_CATEGORY} ")))
            .unwrap();
        assert_eq!(resolved, NONE_SELECTED);
        assert_eq!(registry.active(), NONE_SELECTED);
        assert_eq!(registry.labels().len(), 3);
    }

    #[test]
    fn unknown_existing_category_is_rejected() {
        let mut registry = CategoryRegistry::derive(&ledger(&["Job"]));
        assert_eq!(
            registry.resolve(&CategoryChoice::Existing("Job".into())),
            Ok("Job".to_string())
        );
        assert_eq!(
            registry.resolve(&CategoryChoice::Existing("Nope".into())),
            Err(ValidationError::UnknownCategory("Nope".into()))
        );
        assert_eq!(
            registry.resolve(&CategoryChoice::Existing(" ".into())),
            Err(ValidationError::EmptyField("category"))
        );
    }

    #[test]
    fn absorb_keeps_labels_no_longer_in_ledger() {
        let mut registry = CategoryRegistry::derive(&ledger(&["Job"]));
        registry.absorb(&ledger(&["Food"]));
        assert_eq!(
            registry.labels(),
            &[NONE_SELECTED, ADD_NEW_CATEGORY, "Job", "Food"]
        );
    }

    #[test]
    fn selectable_skips_add_new_sentinel() {
        let registry = CategoryRegistry::derive(&ledger(&["Job"]));
        let labels: Vec<&str> = registry.selectable().collect();
        assert_eq!(labels, vec![NONE_SELECTED, "Job"]);
    }
}
