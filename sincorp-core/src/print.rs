//! Boundary to the document renderer.
//!
//! [`PrintableDocument`] carries every value a layout needs as a display
//! string: money already formatted, dates already `dd/mm/yyyy`, totals
//! already computed. Renderers only arrange text.

use std::fmt::Write as _;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::common::format_date;
use crate::calculations::money::format_money;
use crate::models::{
    ClientInfo, DocumentBody, DocumentPayload, LineItem, Pricing, ReceiptDetails, Totals,
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to lay out document: {0}")]
    Layout(#[from] std::fmt::Error),
}

/// Letterhead printed on every document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyProfile {
    pub name: String,
    pub tax_id: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "Sincorp".to_string(),
            tax_id: "CUIT 30-71234567-8".to_string(),
            address: "Av. Belgrano 1234, San Miguel de Tucumán".to_string(),
            phone: "+54 381 555-0100".to_string(),
            email: "contacto@sincorp.com.ar".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintableTotals {
    pub subtotal: String,
    pub tax: Option<String>,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintableReceipt {
    pub amount: String,
    pub amount_in_words: String,
    pub concept: String,
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintableDocument {
    pub company: CompanyProfile,
    pub title: String,
    pub number: String,
    pub date: String,
    pub status: String,
    pub client: ClientInfo,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    /// `None` for delivery notes and receipts.
    pub totals: Option<PrintableTotals>,
    pub receipt: Option<PrintableReceipt>,
    pub notes: Option<String>,
    pub has_signature: bool,
}

impl PrintableDocument {
    /// Resolves `payload` into display strings under the default letterhead.
    pub fn from_payload(payload: &DocumentPayload) -> Self {
        Self::with_company(payload, CompanyProfile::default())
    }

    pub fn with_company(
        payload: &DocumentPayload,
        company: CompanyProfile,
    ) -> Self {
        let mut doc = Self {
            company,
            title: payload.kind.label().to_string(),
            number: payload.meta.number.clone(),
            date: format_date(payload.meta.date),
            status: payload.meta.status.label().to_string(),
            client: payload.client.clone(),
            columns: Vec::new(),
            rows: Vec::new(),
            totals: None,
            receipt: None,
            notes: payload.meta.notes.clone(),
            has_signature: payload.signature.is_some(),
        };

        match &payload.body {
            DocumentBody::Itemized(ledger) => {
                let pricing = ledger.pricing();
                doc.columns = columns(pricing);
                doc.rows = ledger.items().iter().map(|item| row(item, pricing)).collect();
                if pricing.has_amounts() {
                    doc.totals = Some(printable_totals(ledger.totals()));
                }
            }
            DocumentBody::Receipt(receipt) => doc.receipt = Some(printable_receipt(receipt)),
        }
        doc
    }
}

fn columns(pricing: Pricing) -> Vec<&'static str> {
    match pricing {
        Pricing::PricedByUnit { .. } => vec!["Descripción", "Cantidad", "Precio unit.", "Importe"],
        Pricing::FlatAmount => vec!["Fecha", "Descripción", "Importe", "Observaciones"],
        Pricing::QuantityOnly => vec!["Cantidad", "Unidad", "Descripción", "Observaciones"],
    }
}

fn row(
    item: &LineItem,
    pricing: Pricing,
) -> Vec<String> {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    match pricing {
        Pricing::PricedByUnit { .. } => vec![
            item.description.clone(),
            format_quantity(item.quantity),
            format_money(item.unit_price),
            format_money(Some(item.amount)),
        ],
        Pricing::FlatAmount => vec![
            item.date.map(format_date).unwrap_or_default(),
            item.description.clone(),
            format_money(Some(item.amount)),
            text(&item.comments),
        ],
        Pricing::QuantityOnly => vec![
            format_quantity(item.quantity),
            text(&item.unit),
            item.description.clone(),
            text(&item.comments),
        ],
    }
}

fn printable_totals(totals: Totals) -> PrintableTotals {
    PrintableTotals {
        subtotal: format_money(Some(totals.subtotal)),
        tax: totals.tax.map(|tax| format_money(Some(tax))),
        total: format_money(Some(totals.total)),
    }
}

fn printable_receipt(receipt: &ReceiptDetails) -> PrintableReceipt {
    PrintableReceipt {
        amount: format_money(Some(receipt.amount)),
        amount_in_words: receipt.amount_in_words.clone(),
        concept: receipt.concept.clone(),
        payment_method: receipt.payment_method.clone(),
    }
}

/// Quantities print without trailing zeros and with a decimal comma.
fn format_quantity(quantity: Option<Decimal>) -> String {
    quantity
        .map(|q| q.normalize().to_string().replace('.', ","))
        .unwrap_or_default()
}

/// Turns a [`PrintableDocument`] into a downloadable file.
pub trait DocumentRenderer: Send + Sync {
    fn render(
        &self,
        doc: &PrintableDocument,
    ) -> Result<Vec<u8>, RenderError>;

    fn content_type(&self) -> &'static str;
}

/// Plain UTF-8 layout, one column-aligned table per document.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    fn write(
        &self,
        doc: &PrintableDocument,
        out: &mut String,
    ) -> std::fmt::Result {
        let company = &doc.company;
        writeln!(out, "{}", company.name)?;
        writeln!(out, "{} | {}", company.tax_id, company.address)?;
        writeln!(out, "{} | {}", company.phone, company.email)?;
        writeln!(out)?;

        if doc.number.is_empty() {
            writeln!(out, "{}", doc.title.to_uppercase())?;
        } else {
            writeln!(out, "{} N° {}", doc.title.to_uppercase(), doc.number)?;
        }
        writeln!(out, "Fecha: {}    Estado: {}", doc.date, doc.status)?;
        writeln!(out)?;

        let client = &doc.client;
        writeln!(out, "Cliente: {}", client.name)?;
        for (label, value) in [
            ("CUIT", &client.tax_id),
            ("Domicilio", &client.address),
            ("Teléfono", &client.phone),
            ("Email", &client.email),
        ] {
            if !value.is_empty() {
                writeln!(out, "{label}: {value}")?;
            }
        }

        if !doc.columns.is_empty() {
            writeln!(out)?;
            write_table(out, &doc.columns, &doc.rows)?;
        }

        if let Some(totals) = &doc.totals {
            writeln!(out)?;
            writeln!(out, "Subtotal: {}", totals.subtotal)?;
            if let Some(tax) = &totals.tax {
                writeln!(out, "IVA 21%: {tax}")?;
            }
            writeln!(out, "Total: {}", totals.total)?;
        }

        if let Some(receipt) = &doc.receipt {
            writeln!(out)?;
            writeln!(out, "Recibí la suma de {}", receipt.amount)?;
            writeln!(out, "Son: {}", receipt.amount_in_words)?;
            if !receipt.concept.is_empty() {
                writeln!(out, "En concepto de: {}", receipt.concept)?;
            }
            if let Some(method) = &receipt.payment_method {
                writeln!(out, "Forma de pago: {method}")?;
            }
        }

        if let Some(notes) = &doc.notes {
            writeln!(out)?;
            writeln!(out, "Observaciones: {notes}")?;
        }

        if doc.has_signature {
            writeln!(out)?;
            writeln!(out, "[Firma adjunta]")?;
        }
        Ok(())
    }
}

fn write_table(
    out: &mut String,
    columns: &[&str],
    rows: &[Vec<String>],
) -> std::fmt::Result {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, columns, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", rule.join("-+-"))?;
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        write_row(out, &cells, &widths)?;
    }
    Ok(())
}

fn write_row(
    out: &mut String,
    cells: &[&str],
    widths: &[usize],
) -> std::fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    writeln!(out, "{}", padded.join(" | ").trim_end())
}

impl DocumentRenderer for TextRenderer {
    fn render(
        &self,
        doc: &PrintableDocument,
    ) -> Result<Vec<u8>, RenderError> {
        let mut out = String::new();
        self.write(doc, &mut out)?;
        Ok(out.into_bytes())
    }

    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }
}
