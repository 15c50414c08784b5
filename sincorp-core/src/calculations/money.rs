//! Peso amounts as shown on screen and on paper: `$1.234.567,50`.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use super::common::round_half_up;

/// Error returned when operator text cannot be read as a peso amount.
#[derive(Debug, Error, PartialEq)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseMoneyError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Formats an amount with `.` thousands grouping and a `,` decimal mark.
///
/// `None` renders as `$0,00`. The sign is dropped: documents only ever
/// print magnitudes.
///
/// ```
/// use rust_decimal_macros::dec;
/// use sincorp_core::calculations::format_money;
///
/// assert_eq!(format_money(Some(dec!(1234567.5))), "$1.234.567,50");
/// assert_eq!(format_money(None), "$0,00");
/// ```
pub fn format_money(amount: Option<Decimal>) -> String {
    let Some(amount) = amount else {
        return "$0,00".to_string();
    };

    let mut rounded = round_half_up(amount.abs());
    rounded.rescale(2);
    let plain = rounded.to_string();
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    format!("${},{}", group_thousands(integer), fraction)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

/// Parses an amount written the local way: optional leading `$`, `.` as
/// grouping, `,` as decimal mark. Blank input is zero.
pub fn parse_money(text: &str) -> Result<Decimal, ParseMoneyError> {
    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let normalized: String = unsigned
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }

    normalized.parse().map_err(|e| ParseMoneyError {
        input: text.to_string(),
        source: e,
    })
}

/// Reads a numeric line-item field, never failing.
///
/// Input goes through [`parse_money`], so `1.500` is fifteen hundred.
/// Blank or unreadable text counts as zero.
pub fn coerce_decimal(text: &str) -> Decimal {
    coerce_optional_decimal(text).unwrap_or(Decimal::ZERO)
}

/// Like [`coerce_decimal`] but keeps "nothing entered" distinguishable.
pub fn coerce_optional_decimal(text: &str) -> Option<Decimal> {
    if text.trim().is_empty() {
        return None;
    }
    match parse_money(text) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(input = %text, "coercing unreadable amount to zero: {}", e);
            None
        }
    }
}
