use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Running totals of a document's line items.
///
/// `total == subtotal + tax.unwrap_or(0)` always holds for values produced
/// by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Option<Decimal>,
    pub total: Decimal,
}

impl Totals {
    pub fn zero() -> Self {
        Self::default()
    }
}
