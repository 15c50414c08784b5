use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the line items of a document are priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pricing {
    /// `amount = quantity × unit_price`; `taxed` adds IVA on the subtotal.
    PricedByUnit { taxed: bool },
    /// The operator enters each amount directly.
    FlatAmount,
    /// Quantity and unit only; no money on the document.
    QuantityOnly,
}

impl Pricing {
    pub fn has_amounts(&self) -> bool {
        !matches!(self, Self::QuantityOnly)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Locally unique within one document; only used for display order and edits.
    pub id: u32,
    pub date: Option<NaiveDate>,
    pub description: String,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub amount: Decimal,
    pub unit: Option<String>,
    pub comments: Option<String>,
}

impl LineItem {
    /// A blank row as inserted by "add item".
    pub fn blank(id: u32) -> Self {
        Self {
            id,
            date: None,
            description: String::new(),
            quantity: None,
            unit_price: None,
            amount: Decimal::ZERO,
            unit: None,
            comments: None,
        }
    }
}

/// Closed set of edits a view may apply to one line item.
///
/// Numeric fields carry the operator's raw text; the ledger coerces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemUpdate {
    Date(Option<NaiveDate>),
    Description(String),
    Quantity(String),
    UnitPrice(String),
    Amount(String),
    Unit(String),
    Comments(String),
}

impl ItemUpdate {
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Date(_) => "date",
            Self::Description(_) => "description",
            Self::Quantity(_) => "quantity",
            Self::UnitPrice(_) => "unit_price",
            Self::Amount(_) => "amount",
            Self::Unit(_) => "unit",
            Self::Comments(_) => "comments",
        }
    }

    /// Whether this edit makes sense for items priced with `pricing`.
    pub fn applies_to(&self, pricing: Pricing) -> bool {
        match (self, pricing) {
            (Self::UnitPrice(_), Pricing::PricedByUnit { .. }) => true,
            (Self::UnitPrice(_), _) => false,
            (Self::Amount(_), Pricing::FlatAmount) => true,
            (Self::Amount(_), _) => false,
            (Self::Quantity(_), Pricing::FlatAmount) => false,
            (Self::Unit(_), Pricing::QuantityOnly) => true,
            (Self::Unit(_), _) => false,
            _ => true,
        }
    }
}
