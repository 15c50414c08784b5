//! Rounding and date helpers used across the calculations.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 go away from zero, matching how amounts are
/// printed on quotes and receipts.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use sincorp_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(52.505)), dec!(52.51));
/// assert_eq!(round_half_up(dec!(-0.125)), dec!(-0.13));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Renders a date the way it appears on printed documents: `dd/mm/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Parses `dd/mm/yyyy` (as printed) or ISO `yyyy-mm-dd` (as stored by
/// date inputs). Returns `None` for anything else.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}
