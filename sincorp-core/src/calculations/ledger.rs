//! Line items and their running totals.
//!
//! | Pricing                 | Line amount              | Tax                 |
//! |-------------------------|--------------------------|---------------------|
//! | `PricedByUnit` (quotes) | quantity × unit price    | 21% of the subtotal |
//! | `FlatAmount` (estados)  | amount as entered        | none                |
//! | `QuantityOnly` (remitos)| zero                     | none                |
//!
//! Totals are a pure fold over the current items; [`Ledger`] recomputes them
//! after every mutation so they never drift from their inputs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::common::round_half_up;
use super::money::{coerce_decimal, coerce_optional_decimal};
use crate::models::{ItemUpdate, LineItem, Pricing, Totals};

/// IVA applied to taxed documents (21%).
pub const TAX_RATE: Decimal = dec!(0.21);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("no line item with id {0}")]
    UnknownItem(u32),

    #[error("field '{field}' does not apply to {pricing:?} line items")]
    NotApplicable {
        field: &'static str,
        pricing: Pricing,
    },

    #[error("a document needs at least one line item")]
    Empty,
}

/// Amount one item contributes to the subtotal. Missing operands count as
/// zero, and so does a product too large to represent.
pub fn line_amount(
    item: &LineItem,
    pricing: Pricing,
) -> Decimal {
    match pricing {
        Pricing::PricedByUnit { .. } => {
            let quantity = item.quantity.unwrap_or(Decimal::ZERO);
            let unit_price = item.unit_price.unwrap_or(Decimal::ZERO);
            quantity.checked_mul(unit_price).unwrap_or_else(|| {
                warn!(id = item.id, %quantity, %unit_price, "line amount overflows, counted as zero");
                Decimal::ZERO
            })
        }
        Pricing::FlatAmount => item.amount,
        Pricing::QuantityOnly => Decimal::ZERO,
    }
}

/// Tax on `subtotal` and the resulting total, or `None` when the total
/// cannot be represented.
fn with_tax(
    subtotal: Decimal,
    pricing: Pricing,
) -> Option<(Option<Decimal>, Decimal)> {
    match pricing {
        Pricing::PricedByUnit { taxed: true } => {
            let tax = round_half_up(subtotal.checked_mul(TAX_RATE)?);
            Some((Some(tax), subtotal.checked_add(tax)?))
        }
        _ => Some((None, subtotal)),
    }
}

/// Sums `items` in list order and derives tax and total.
///
/// A line that would push the total past what a `Decimal` holds is left out
/// and logged.
///
/// ```
/// use rust_decimal_macros::dec;
/// use sincorp_core::calculations::recompute;
/// use sincorp_core::{LineItem, Pricing};
///
/// let mut first = LineItem::blank(1);
/// first.quantity = Some(dec!(2));
/// first.unit_price = Some(dec!(100));
/// let mut second = LineItem::blank(2);
/// second.quantity = Some(dec!(1));
/// second.unit_price = Some(dec!(50));
///
/// let totals = recompute(&[first, second], Pricing::PricedByUnit { taxed: true });
///
/// assert_eq!(totals.subtotal, dec!(250));
/// assert_eq!(totals.tax, Some(dec!(52.5)));
/// assert_eq!(totals.total, dec!(302.5));
/// ```
pub fn recompute(
    items: &[LineItem],
    pricing: Pricing,
) -> Totals {
    let mut subtotal = Decimal::ZERO;
    for item in items {
        let amount = line_amount(item, pricing);
        match subtotal
            .checked_add(amount)
            .filter(|sum| with_tax(*sum, pricing).is_some())
        {
            Some(sum) => subtotal = sum,
            None => warn!(id = item.id, %amount, "total overflows, line left out"),
        }
    }

    let (tax, total) = with_tax(subtotal, pricing).unwrap_or((None, subtotal));
    Totals {
        subtotal,
        tax,
        total,
    }
}

/// Id for a new item: one past the largest id in use, or 1 for an empty list.
pub fn next_item_id(items: &[LineItem]) -> u32 {
    items.iter().map(|item| item.id).max().map_or(1, |max| max + 1)
}

/// An ordered, never-empty list of line items plus their current totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LedgerRecord")]
pub struct Ledger {
    pricing: Pricing,
    items: Vec<LineItem>,
    totals: Totals,
}

/// Wire form; totals are recomputed on load rather than trusted.
#[derive(Deserialize)]
struct LedgerRecord {
    pricing: Pricing,
    items: Vec<LineItem>,
}

impl TryFrom<LedgerRecord> for Ledger {
    type Error = LedgerError;

    fn try_from(record: LedgerRecord) -> Result<Self, Self::Error> {
        Ledger::from_items(record.pricing, record.items)
    }
}

impl Ledger {
    /// A ledger holding one blank item with id 1.
    pub fn new(pricing: Pricing) -> Self {
        let items = vec![LineItem::blank(1)];
        let totals = recompute(&items, pricing);
        Self {
            pricing,
            items,
            totals,
        }
    }

    /// Builds a ledger from existing items, refreshing priced amounts.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Empty`] when `items` is empty.
    pub fn from_items(
        pricing: Pricing,
        mut items: Vec<LineItem>,
    ) -> Result<Self, LedgerError> {
        if items.is_empty() {
            return Err(LedgerError::Empty);
        }
        if let Pricing::PricedByUnit { .. } = pricing {
            for item in &mut items {
                item.amount = line_amount(item, pricing);
            }
        }
        let totals = recompute(&items, pricing);
        Ok(Self {
            pricing,
            items,
            totals,
        })
    }

    pub fn pricing(&self) -> Pricing {
        self.pricing
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Appends a blank item and returns its id.
    pub fn add_item(&mut self) -> u32 {
        let id = next_item_id(&self.items);
        self.items.push(LineItem::blank(id));
        self.recompute();
        id
    }

    /// Removes the item with `id`.
    ///
    /// Returns `false` without touching anything when `id` is unknown or
    /// names the only remaining item.
    pub fn remove_item(
        &mut self,
        id: u32,
    ) -> bool {
        if self.items.len() <= 1 {
            return false;
        }
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() == before {
            return false;
        }
        self.recompute();
        true
    }

    /// Applies one field edit to the item with `id` and recomputes.
    ///
    /// # Errors
    ///
    /// * [`LedgerError::NotApplicable`] when the field has no meaning for
    ///   this ledger's pricing (e.g. a unit price on a statement).
    /// * [`LedgerError::UnknownItem`] when no item has `id`.
    pub fn update_item(
        &mut self,
        id: u32,
        update: ItemUpdate,
    ) -> Result<(), LedgerError> {
        let pricing = self.pricing;
        if !update.applies_to(pricing) {
            return Err(LedgerError::NotApplicable {
                field: update.field_name(),
                pricing,
            });
        }

        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(LedgerError::UnknownItem(id))?;

        let reprice = matches!(update, ItemUpdate::Quantity(_) | ItemUpdate::UnitPrice(_));
        match update {
            ItemUpdate::Date(date) => item.date = date,
            ItemUpdate::Description(text) => item.description = text,
            ItemUpdate::Quantity(text) => item.quantity = coerce_optional_decimal(&text),
            ItemUpdate::UnitPrice(text) => item.unit_price = coerce_optional_decimal(&text),
            ItemUpdate::Amount(text) => item.amount = coerce_decimal(&text),
            ItemUpdate::Unit(text) => item.unit = non_blank(text),
            ItemUpdate::Comments(text) => item.comments = non_blank(text),
        }
        if reprice && matches!(pricing, Pricing::PricedByUnit { .. }) {
            item.amount = line_amount(item, pricing);
        }

        self.recompute();
        Ok(())
    }

    /// Refreshes the cached totals from the current items.
    pub fn recompute(&mut self) -> Totals {
        self.totals = recompute(&self.items, self.pricing);
        debug!(
            items = self.items.len(),
            subtotal = %self.totals.subtotal,
            total = %self.totals.total,
            "ledger recomputed"
        );
        self.totals
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}
