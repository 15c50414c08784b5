//! Arithmetic and formatting shared by the document editors.
//!
//! Everything in here is pure: no I/O, no retained state.

pub mod common;
pub mod ledger;
pub mod money;
pub mod words;

pub use ledger::{Ledger, LedgerError, TAX_RATE, line_amount, recompute};
pub use money::{
    ParseMoneyError, coerce_decimal, coerce_optional_decimal, format_money, parse_money,
};
pub use words::{WordsError, to_words};
