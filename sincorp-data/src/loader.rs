use std::io::Read;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use sincorp_core::calculations::common::parse_date;
use sincorp_core::{
    DocumentEditorState, DocumentId, DocumentKind, DocumentRepository, EditorError, ItemUpdate,
};
use thiserror::Error;
use tracing::info;

/// Errors that can occur when importing line items.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("{0:?} documents have no line items")]
    NotItemized(DocumentKind),

    #[error("no line items to import")]
    Empty,

    #[error("row {row}: invalid date '{value}' (expected dd/mm/yyyy or yyyy-mm-dd)")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: EditorError,
    },

    #[error(transparent)]
    Editor(#[from] EditorError),
}

impl From<csv::Error> for LoaderError {
    fn from(err: csv::Error) -> Self {
        LoaderError::CsvParse(err.to_string())
    }
}

/// A single row from a line-item CSV file.
///
/// Amount cells are kept as the operator wrote them (`1.234,50`,
/// `$ 18.000`, `4.500,50`) and read the same way the editor reads typed
/// input. Blank cells are `None`.
///
/// - `date`: `dd/mm/yyyy` or `yyyy-mm-dd` (statements)
/// - `description`: free text
/// - `quantity`: quotes and delivery notes
/// - `unit_price`: quotes
/// - `amount`: statements
/// - `unit`: delivery notes
/// - `comments`: statements and delivery notes
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LineItemRecord {
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub date: Option<String>,
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub unit_price: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub comments: Option<String>,
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

impl LineItemRecord {
    fn updates(
        &self,
        row: usize,
    ) -> Result<Vec<ItemUpdate>, LoaderError> {
        let mut updates = vec![ItemUpdate::Description(self.description.trim().to_string())];

        if let Some(value) = &self.date {
            let date = parse_date(value).ok_or_else(|| LoaderError::InvalidDate {
                row,
                value: value.clone(),
            })?;
            updates.push(ItemUpdate::Date(Some(date)));
        }
        if let Some(value) = &self.quantity {
            updates.push(ItemUpdate::Quantity(value.clone()));
        }
        if let Some(value) = &self.unit_price {
            updates.push(ItemUpdate::UnitPrice(value.clone()));
        }
        if let Some(value) = &self.amount {
            updates.push(ItemUpdate::Amount(value.clone()));
        }
        if let Some(value) = &self.unit {
            updates.push(ItemUpdate::Unit(value.clone()));
        }
        if let Some(value) = &self.comments {
            updates.push(ItemUpdate::Comments(value.clone()));
        }
        Ok(updates)
    }
}

/// Builds itemized documents from CSV files.
///
/// Every row goes through the same editor operations an operator would
/// use, so totals come out exactly as they would on screen.
pub struct LineItemLoader;

impl LineItemLoader {
    /// Parse line-item records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<LineItemRecord>, LoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: LineItemRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Start a draft of `kind` dated `date` holding one line item per record.
    ///
    /// # Errors
    /// * [`LoaderError::NotItemized`] for receipts.
    /// * [`LoaderError::Empty`] when `records` is empty.
    /// * [`LoaderError::InvalidDate`] for an unreadable `date` cell.
    /// * [`LoaderError::Row`] when a filled cell has no meaning for `kind`
    ///   (e.g. a unit price on a statement).
    pub fn build(
        kind: DocumentKind,
        records: &[LineItemRecord],
        date: NaiveDate,
    ) -> Result<DocumentEditorState, LoaderError> {
        if kind.pricing().is_none() {
            return Err(LoaderError::NotItemized(kind));
        }
        if records.is_empty() {
            return Err(LoaderError::Empty);
        }

        let mut editor = DocumentEditorState::new(kind, date);
        for (index, record) in records.iter().enumerate() {
            // Header is line 1.
            let row = index + 2;
            let id = match index {
                0 => 1,
                _ => editor.on_add_item()?,
            };
            for update in record.updates(row)? {
                editor
                    .on_item_change(id, update)
                    .map_err(|source| LoaderError::Row { row, source })?;
            }
        }
        Ok(editor)
    }

    /// Build the draft and save it through `repo`.
    pub async fn import(
        repo: &dyn DocumentRepository,
        kind: DocumentKind,
        records: &[LineItemRecord],
        date: NaiveDate,
    ) -> Result<(DocumentId, DocumentEditorState), LoaderError> {
        let mut editor = Self::build(kind, records, date)?;
        let id = editor.save(repo).await?;
        info!(kind = ?kind, id, items = records.len(), "imported line items");
        Ok((id, editor))
    }
}
