//! Period aggregation: reduces every transaction to an annual equivalent and
//! projects the sum back onto hour, day, week, month and year.

use nubage_domain::{Ledger, Sign, Transaction};
use tracing::{debug, warn};

use crate::error::CalculationError;

pub const HOURS_PER_YEAR: f64 = 8760.0;
pub const DAYS_PER_YEAR: f64 = 365.0;
pub const WEEKS_PER_YEAR: f64 = 52.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;

pub const HOUR_DECIMALS: u32 = 4;
pub const DAY_DECIMALS: u32 = 2;
pub const WEEK_DECIMALS: u32 = 2;
pub const MONTH_DECIMALS: u32 = 0;
pub const YEAR_DECIMALS: u32 = 0;

/// Projected totals of a ledger, rounded to display precision.
///
/// `annual_total` keeps the unrounded sum; the sign classification is taken
/// from it so that a tiny negative total still reads as negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregationResult {
    pub hour: f64,
    pub day: f64,
    pub week: f64,
    pub month: f64,
    pub year: f64,
    pub annual_total: f64,
}

impl AggregationResult {
    /// All-zero projections, classified positive.
    pub fn zero() -> Self {
        Self::from_annual_total(0.0)
    }

    pub fn from_annual_total(annual_total: f64) -> Self {
        Self {
            hour: round_half_up(annual_total / HOURS_PER_YEAR, HOUR_DECIMALS),
            day: round_half_up(annual_total / DAYS_PER_YEAR, DAY_DECIMALS),
            week: round_half_up(annual_total / WEEKS_PER_YEAR, WEEK_DECIMALS),
            month: round_half_up(annual_total / MONTHS_PER_YEAR, MONTH_DECIMALS),
            year: round_half_up(annual_total, YEAR_DECIMALS),
            annual_total,
        }
    }

    /// Classification for the five figures as a group.
    pub fn sign(&self) -> Sign {
        Sign::of(self.annual_total)
    }

    pub fn is_negative(&self) -> bool {
        self.sign().is_negative()
    }

    pub fn formatted(&self) -> FormattedProjections {
        FormattedProjections {
            hour: format_rounded(self.hour, HOUR_DECIMALS),
            day: format_rounded(self.day, DAY_DECIMALS),
            week: format_rounded(self.week, WEEK_DECIMALS),
            month: format_rounded(self.month, MONTH_DECIMALS),
            year: format_rounded(self.year, YEAR_DECIMALS),
            sign: self.sign(),
        }
    }
}

impl Default for AggregationResult {
    fn default() -> Self {
        Self::zero()
    }
}

/// Display strings for the five projections (`#.####`, `#.##`, `#`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedProjections {
    pub hour: String,
    pub day: String,
    pub week: String,
    pub month: String,
    pub year: String,
    pub sign: Sign,
}

pub struct AggregationService;

impl AggregationService {
    /// Sums the annual equivalents of every entry and projects the total.
    ///
    /// Fails on the first entry whose value does not parse, whose period is
    /// unknown, or that pushes the sum out of the finite range; no partial
    /// result is produced.
    pub fn aggregate(ledger: &Ledger) -> Result<AggregationResult, CalculationError> {
        let mut annual_total = 0.0;
        for (index, transaction) in ledger.transactions().enumerate() {
            annual_total = Self::annual_contribution(index, transaction)
                .and_then(|contribution| {
                    let sum = annual_total + contribution;
                    if sum.is_finite() {
                        Ok(sum)
                    } else {
                        Err(CalculationError::Overflow {
                            index,
                            title: transaction.title().to_string(),
                        })
                    }
                })
                .map_err(|err| {
                    warn!(%err, "aggregation aborted");
                    err
                })?;
        }
        debug!(entries = ledger.len(), annual_total, "ledger aggregated");
        Ok(AggregationResult::from_annual_total(annual_total))
    }

    /// The transaction's value rescaled to one year.
    pub fn annual_contribution(
        index: usize,
        transaction: &Transaction,
    ) -> Result<f64, CalculationError> {
        let amount = transaction
            .amount()
            .map_err(|_| CalculationError::InvalidValue {
                index,
                title: transaction.title().to_string(),
                value: transaction.value().to_string(),
            })?;
        let period = transaction
            .period()
            .map_err(|_| CalculationError::UnrecognizedPeriod {
                index,
                title: transaction.title().to_string(),
                period: transaction.period_label().to_string(),
            })?;
        let contribution = amount * period.annual_multiplier();
        if !contribution.is_finite() {
            return Err(CalculationError::Overflow {
                index,
                title: transaction.title().to_string(),
            });
        }
        Ok(contribution)
    }
}

/// Rounds half away from zero to `places` decimals. Never returns `-0.0`.
pub fn round_half_up(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Formats an already rounded figure without trailing zeros.
pub fn format_rounded(value: f64, places: u32) -> String {
    let mut text = format!("{:.*}", places as usize, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".into();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use nubage_domain::{Period, Transaction};

    fn ledger(entries: &[(&str, Period)]) -> Ledger {
        entries
            .iter()
            .enumerate()
            .map(|(i, (value, period))| {
                Transaction::new(format!("entry-{i}"), *value, *period, "Misc")
            })
            .collect()
    }

    #[test]
    fn empty_ledger_aggregates_to_zero() {
        let result = AggregationService::aggregate(&Ledger::new()).unwrap();
        assert_eq!(result, AggregationResult::zero());
        assert_eq!(result.sign(), Sign::Positive);
        let text = result.formatted();
        assert_eq!(
            [text.hour, text.day, text.week, text.month, text.year],
            ["0", "0", "0", "0", "0"].map(String::from)
        );
    }

    #[test]
    fn monthly_rent_projects_to_all_scales() {
        let result = AggregationService::aggregate(&ledger(&[("-1200", Period::Month)])).unwrap();
        assert_eq!(result.year, -14400.0);
        assert_eq!(result.month, -1200.0);
        assert_eq!(result.hour, -1.6438);
        assert_eq!(result.day, -39.45);
        assert_eq!(result.week, -276.92);
        assert!(result.is_negative());

        let text = result.formatted();
        assert_eq!(text.hour, "-1.6438");
        assert_eq!(text.day, "-39.45");
        assert_eq!(text.week, "-276.92");
        assert_eq!(text.month, "-1200");
        assert_eq!(text.year, "-14400");
    }

    #[test]
    fn year_is_sum_of_annual_contributions() {
        let ledger = ledger(&[
            ("100", Period::Year),
            ("50", Period::SixMonths),
            ("-25", Period::Quarter),
            ("10", Period::Month),
            ("-1", Period::Week),
            ("0.5", Period::Day),
        ]);
        let expected = 100.0 + 100.0 - 100.0 + 120.0 - 52.0 + 182.5;
        let result = AggregationService::aggregate(&ledger).unwrap();
        assert_eq!(result.annual_total, expected);
        assert_eq!(result.year, round_half_up(expected, 0));
        assert_eq!(result.hour, round_half_up(expected / 8760.0, 4));
    }

    #[test]
    fn income_and_expense_net_out() {
        let ledger = ledger(&[("3600.0", Period::Month), ("-1200.0", Period::Month)]);
        let result = AggregationService::aggregate(&ledger).unwrap();
        assert_eq!(result.year, 28800.0);
        assert_eq!(result.sign(), Sign::Positive);
    }

    #[test]
    fn zero_total_is_positive() {
        let ledger = ledger(&[("10", Period::Year), ("-10", Period::Year)]);
        let result = AggregationService::aggregate(&ledger).unwrap();
        assert_eq!(result.sign(), Sign::Positive);
    }

    #[test]
    fn unrecognized_period_fails_whole_aggregation() {
        let mut ledger = ledger(&[("10", Period::Year)]);
        ledger.push(Transaction::from_parts("Odd", "5", "Fortnight", "Misc"));
        let err = AggregationService::aggregate(&ledger).unwrap_err();
        assert_eq!(
            err,
            CalculationError::UnrecognizedPeriod {
                index: 1,
                title: "Odd".into(),
                period: "Fortnight".into(),
            }
        );
        assert!(err.to_string().contains("Calculating error"));
    }

    #[test]
    fn non_numeric_value_fails_whole_aggregation() {
        let mut ledger = Ledger::new();
        ledger.push(Transaction::from_parts("Bad", "ten", "Month", "Misc"));
        let err = AggregationService::aggregate(&ledger).unwrap_err();
        assert!(matches!(err, CalculationError::InvalidValue { index: 0, .. }));
    }

    #[test]
    fn out_of_range_contribution_fails_whole_aggregation() {
        let ledger = ledger(&[("10", Period::Year), ("1e308", Period::Day), ("-1e308", Period::Day)]);
        let err = AggregationService::aggregate(&ledger).unwrap_err();
        assert_eq!(
            err,
            CalculationError::Overflow {
                index: 1,
                title: "entry-1".into(),
            }
        );
        assert!(err.to_string().starts_with("Calculating error"));
    }

    #[test]
    fn finite_entries_overflowing_the_sum_fail() {
        let ledger = ledger(&[("1e308", Period::Year), ("1e308", Period::Year)]);
        let err = AggregationService::aggregate(&ledger).unwrap_err();
        assert!(matches!(err, CalculationError::Overflow { index: 1, .. }));
    }

    #[test]
    fn rounding_is_half_up_and_trims_zeros() {
        assert_eq!(round_half_up(2.5, 0), 3.0);
        assert_eq!(round_half_up(-2.5, 0), -3.0);
        assert_eq!(round_half_up(0.125, 2), 0.13);
        assert_eq!(round_half_up(-0.00001, 4), 0.0);
        assert_eq!(format_rounded(12.5, 2), "12.5");
        assert_eq!(format_rounded(7.0, 4), "7");
        assert_eq!(format_rounded(-0.0, 0), "0");
    }
}
