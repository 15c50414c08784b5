use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line_item::Pricing;
use crate::calculations::ledger::Ledger;
use crate::db::Collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// Presupuesto.
    Quote,
    /// Estado de cuenta.
    Statement,
    /// Remito.
    DeliveryNote,
    /// Recibo.
    Receipt,
}

impl DocumentKind {
    pub fn all() -> &'static [DocumentKind] {
        &[
            DocumentKind::Quote,
            DocumentKind::Statement,
            DocumentKind::DeliveryNote,
            DocumentKind::Receipt,
        ]
    }

    pub fn collection(&self) -> Collection {
        match self {
            Self::Quote => Collection::Quotes,
            Self::Statement => Collection::Statements,
            Self::DeliveryNote => Collection::DeliveryNotes,
            Self::Receipt => Collection::Receipts,
        }
    }

    /// Pricing rule for the line items, `None` for receipts.
    pub fn pricing(&self) -> Option<Pricing> {
        match self {
            Self::Quote => Some(Pricing::PricedByUnit { taxed: true }),
            Self::Statement => Some(Pricing::FlatAmount),
            Self::DeliveryNote => Some(Pricing::QuantityOnly),
            Self::Receipt => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Quote => "Presupuesto",
            Self::Statement => "Estado de cuenta",
            Self::DeliveryNote => "Remito",
            Self::Receipt => "Recibo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "quote" | "presupuesto" | "presupuestos" => Some(Self::Quote),
            "statement" | "estado" | "estados" => Some(Self::Statement),
            "delivery-note" | "delivery_note" | "remito" | "remitos" => {
                Some(Self::DeliveryNote)
            }
            "receipt" | "recibo" | "recibos" => Some(Self::Receipt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[default]
    Pending,
    Approved,
    Delivered,
    Paid,
    Cancelled,
}

impl DocumentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::Approved => "Aprobado",
            Self::Delivered => "Entregado",
            Self::Paid => "Pagado",
            Self::Cancelled => "Anulado",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    /// CUIT/CUIL or DNI, as typed.
    pub tax_id: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub number: String,
    pub date: NaiveDate,
    pub status: DocumentStatus,
    pub notes: Option<String>,
}

impl DocumentMeta {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            number: String::new(),
            date,
            status: DocumentStatus::default(),
            notes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReceiptDetails {
    pub amount: Decimal,
    /// Cantidad en letras. Regenerated from `amount` unless overridden.
    pub amount_in_words: String,
    /// Set when the operator typed the words by hand.
    pub words_overridden: bool,
    pub concept: String,
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentBody {
    Itemized(Ledger),
    Receipt(ReceiptDetails),
}

impl DocumentBody {
    pub fn for_kind(kind: DocumentKind) -> Self {
        match kind.pricing() {
            Some(pricing) => Self::Itemized(Ledger::new(pricing)),
            None => Self::Receipt(ReceiptDetails::default()),
        }
    }
}

/// The shape handed to the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub kind: DocumentKind,
    pub meta: DocumentMeta,
    pub client: ClientInfo,
    pub body: DocumentBody,
    /// Signature image (data URL), delivery notes only.
    pub signature: Option<String>,
}

impl DocumentPayload {
    /// Grand total for listings: ledger total or receipt amount.
    pub fn total(&self) -> Decimal {
        match &self.body {
            DocumentBody::Itemized(ledger) => ledger.totals().total,
            DocumentBody::Receipt(receipt) => receipt.amount,
        }
    }
}

/// A persisted document as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: i64,
    pub payload: DocumentPayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
