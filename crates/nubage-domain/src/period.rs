//! Recurrence periods and their annual multipliers.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Fixed recurrence cadence attached to a transaction.
///
/// The serialized form is the legacy label (`"6 Months"`, `"Month"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "Year")]
    Year,
    #[serde(rename = "6 Months")]
    SixMonths,
    #[serde(rename = "Quarter")]
    Quarter,
    #[serde(rename = "Month")]
    Month,
    #[serde(rename = "Week")]
    Week,
    #[serde(rename = "Day")]
    Day,
}

impl Default for Period {
    /// The input form preselects the first entry.
    fn default() -> Self {
        Period::Year
    }
}

impl Period {
    /// Every period in the order the input form lists them.
    pub const ALL: [Period; 6] = [
        Period::Year,
        Period::SixMonths,
        Period::Quarter,
        Period::Month,
        Period::Week,
        Period::Day,
    ];

    /// How many times the period occurs in one year.
    pub fn annual_multiplier(self) -> f64 {
        match self {
            Period::Year => 1.0,
            Period::SixMonths => 2.0,
            Period::Quarter => 4.0,
            Period::Month => 12.0,
            Period::Week => 52.0,
            Period::Day => 365.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::Year => "Year",
            Period::SixMonths => "6 Months",
            Period::Quarter => "Quarter",
            Period::Month => "Month",
            Period::Week => "Week",
            Period::Day => "Day",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a label is not one of the six known periods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPeriod(pub String);

impl fmt::Display for UnknownPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized period `{}`", self.0)
    }
}

impl std::error::Error for UnknownPeriod {}

impl FromStr for Period {
    type Err = UnknownPeriod;

    /// Matches labels exactly; persisted files are compared case-sensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|period| period.label() == value)
            .ok_or_else(|| UnknownPeriod(value.to_string()))
    }
}
