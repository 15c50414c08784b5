mod document;
mod line_item;
mod totals;

pub use document::{
    ClientInfo, DocumentBody, DocumentKind, DocumentMeta, DocumentPayload, DocumentStatus,
    ReceiptDetails, StoredDocument,
};
pub use line_item::{ItemUpdate, LineItem, Pricing};
pub use totals::Totals;
