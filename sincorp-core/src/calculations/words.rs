//! Cantidad en letras: Spanish words for a peso amount, as printed on receipts.
//!
//! The integer part is split into base-1000 groups (units, thousands,
//! millions). Each group of 1–999 is spelled from lookup tables; scale words
//! are `mil` and `millón`/`millones`. Cents are appended as `con NN/100`.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use sincorp_core::calculations::to_words;
//!
//! assert_eq!(to_words(dec!(1500.5)).unwrap(), "Mil quinientos pesos con 50/100");
//! assert_eq!(to_words(dec!(15)).unwrap(), "Quince pesos");
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

use super::common::round_half_up;

/// First amount that can no longer be spelled (no scale word past millions).
pub const WORDS_LIMIT: u32 = 1_000_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WordsError {
    #[error("cannot spell negative amount {0}")]
    Negative(Decimal),

    #[error("amount {0} is too large to spell (limit is 999.999.999,99)")]
    OutOfRange(Decimal),
}

const UNITS: [&str; 10] = [
    "", "uno", "dos", "tres", "cuatro", "cinco", "seis", "siete", "ocho", "nueve",
];

const TEENS: [&str; 10] = [
    "diez",
    "once",
    "doce",
    "trece",
    "catorce",
    "quince",
    "dieciséis",
    "diecisiete",
    "dieciocho",
    "diecinueve",
];

const TENS: [&str; 10] = [
    "", "diez", "veinte", "treinta", "cuarenta", "cincuenta", "sesenta", "setenta", "ochenta",
    "noventa",
];

const HUNDREDS: [&str; 10] = [
    "",
    "ciento",
    "doscientos",
    "trescientos",
    "cuatrocientos",
    "quinientos",
    "seiscientos",
    "setecientos",
    "ochocientos",
    "novecientos",
];

/// Spells `amount` in Spanish, ending in `pesos` plus `con NN/100` when
/// there are cents. The first letter is capitalised.
///
/// # Errors
///
/// * [`WordsError::Negative`] for amounts below zero.
/// * [`WordsError::OutOfRange`] when the amount, rounded to cents, reaches
///   one thousand million.
pub fn to_words(amount: Decimal) -> Result<String, WordsError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(WordsError::Negative(amount));
    }

    let rounded = round_half_up(amount);
    if rounded >= Decimal::from(WORDS_LIMIT) {
        return Err(WordsError::OutOfRange(amount));
    }

    let integer_part = rounded.trunc();
    let pesos = integer_part
        .to_u32()
        .ok_or(WordsError::OutOfRange(amount))?;
    let centavos = ((rounded - integer_part) * Decimal::ONE_HUNDRED)
        .to_u32()
        .unwrap_or(0);

    let mut text = integer_words(pesos);
    text.push_str(match pesos {
        1 => " peso",
        n if n % 1_000_000 == 0 && n > 0 => " de pesos",
        _ => " pesos",
    });
    if centavos > 0 {
        text.push_str(&format!(" con {centavos:02}/100"));
    }

    Ok(capitalize(&text))
}

fn integer_words(n: u32) -> String {
    if n == 0 {
        return "cero".to_string();
    }

    let mut groups = Vec::new();
    let mut rest = n;
    let mut scale = 0;
    while rest > 0 {
        let group = rest % 1000;
        if group > 0 {
            groups.push(scaled_group(group, scale));
        }
        rest /= 1000;
        scale += 1;
    }

    groups.reverse();
    groups.join(" ")
}

fn scaled_group(
    group: u32,
    scale: usize,
) -> String {
    match (scale, group) {
        (0, _) => apocopate(group_words(group)),
        (1, 1) => "mil".to_string(),
        (1, _) => format!("{} mil", apocopate(group_words(group))),
        (_, 1) => "un millón".to_string(),
        (_, _) => format!("{} millones", apocopate(group_words(group))),
    }
}

/// Spells 1–999.
fn group_words(n: u32) -> String {
    let hundreds = (n / 100) as usize;
    let rest = n % 100;

    if hundreds == 1 && rest == 0 {
        return "cien".to_string();
    }

    let tens = tens_words(rest);
    match (hundreds, tens.is_empty()) {
        (0, _) => tens,
        (h, true) => HUNDREDS[h].to_string(),
        (h, false) => format!("{} {}", HUNDREDS[h], tens),
    }
}

/// Spells 0–99 (zero is the empty string).
fn tens_words(n: u32) -> String {
    let n = n as usize;
    match n {
        0..=9 => UNITS[n].to_string(),
        10..=19 => TEENS[n - 10].to_string(),
        _ if n % 10 == 0 => TENS[n / 10].to_string(),
        _ => format!("{} y {}", TENS[n / 10], UNITS[n % 10]),
    }
}

/// `uno` shortens to `un` in front of a noun or scale word.
fn apocopate(words: String) -> String {
    match words.strip_suffix("uno") {
        Some(stem) => format!("{stem}un"),
        None => words,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn words(amount: Decimal) -> String {
        to_words(amount).unwrap()
    }

    // =========================================================================
    // single group tests
    // =========================================================================

    #[test]
    fn spells_irregular_teens() {
        assert_eq!(words(dec!(15)), "Quince pesos");
        assert_eq!(words(dec!(11)), "Once pesos");
        assert_eq!(words(dec!(16)), "Dieciséis pesos");
    }

    #[test]
    fn spells_round_tens_without_conjunction() {
        assert_eq!(words(dec!(10)), "Diez pesos");
        assert_eq!(words(dec!(30)), "Treinta pesos");
    }

    #[test]
    fn joins_tens_and_units_with_y() {
        assert_eq!(words(dec!(47)), "Cuarenta y siete pesos");
    }

    #[test]
    fn uses_cien_only_for_exactly_one_hundred() {
        assert_eq!(words(dec!(100)), "Cien pesos");
        assert_eq!(words(dec!(110)), "Ciento diez pesos");
    }

    #[test]
    fn uses_irregular_hundreds() {
        assert_eq!(words(dec!(500)), "Quinientos pesos");
        assert_eq!(words(dec!(700)), "Setecientos pesos");
        assert_eq!(words(dec!(999)), "Novecientos noventa y nueve pesos");
    }

    #[test]
    fn singular_peso_for_one() {
        assert_eq!(words(dec!(1)), "Un peso");
    }

    #[test]
    fn shortens_trailing_uno_before_pesos() {
        assert_eq!(words(dec!(21)), "Veinte y un pesos");
        assert_eq!(words(dec!(101)), "Ciento un pesos");
    }

    // =========================================================================
    // scale tests
    // =========================================================================

    #[test]
    fn spells_fixture_with_thousands_and_cents() {
        assert_eq!(words(dec!(1500.5)), "Mil quinientos pesos con 50/100");
    }

    #[test]
    fn counts_thousands() {
        assert_eq!(words(dec!(2000)), "Dos mil pesos");
        assert_eq!(words(dec!(21000)), "Veinte y un mil pesos");
        assert_eq!(words(dec!(100100)), "Cien mil cien pesos");
    }

    #[test]
    fn counts_millions() {
        assert_eq!(words(dec!(1000000)), "Un millón de pesos");
        assert_eq!(words(dec!(2500000)), "Dos millones quinientos mil pesos");
        assert_eq!(words(dec!(3000001)), "Tres millones un pesos");
    }

    #[test]
    fn spells_largest_supported_amount() {
        assert_eq!(
            words(dec!(999999999.99)),
            "Novecientos noventa y nueve millones novecientos noventa y nueve mil \
             novecientos noventa y nueve pesos con 99/100"
        );
    }

    // =========================================================================
    // cents and zero tests
    // =========================================================================

    #[test]
    fn zero_is_cero_pesos() {
        assert_eq!(words(dec!(0)), "Cero pesos");
    }

    #[test]
    fn cents_only_keeps_cero() {
        assert_eq!(words(dec!(0.5)), "Cero pesos con 50/100");
    }

    #[test]
    fn pads_single_digit_cents() {
        assert_eq!(words(dec!(3.05)), "Tres pesos con 05/100");
    }

    #[test]
    fn rounds_cents_before_splitting() {
        assert_eq!(words(dec!(1.999)), "Dos pesos");
        assert_eq!(words(dec!(7.125)), "Siete pesos con 13/100");
    }

    // =========================================================================
    // error tests
    // =========================================================================

    #[test]
    fn rejects_negative_amounts() {
        assert_eq!(to_words(dec!(-1)), Err(WordsError::Negative(dec!(-1))));
    }

    #[test]
    fn rejects_one_thousand_million() {
        assert_eq!(
            to_words(dec!(1000000000)),
            Err(WordsError::OutOfRange(dec!(1000000000)))
        );
    }

    #[test]
    fn rejects_amounts_that_round_up_to_the_limit() {
        assert!(matches!(
            to_words(dec!(999999999.999)),
            Err(WordsError::OutOfRange(_))
        ));
    }
}
