//! Editing session for one document.
//!
//! A view forwards every edit to [`DocumentEditorState`], which keeps the
//! line-item totals and the receipt's cantidad en letras in step with the
//! fields they derive from. The lifecycle is an explicit
//! [`EditorPhase`]: `Draft → Saving → Persisted`, and any applied edit of a
//! persisted document starts a new draft of the same record.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calculations::ledger::{Ledger, LedgerError};
use crate::calculations::money::coerce_decimal;
use crate::calculations::words::{WordsError, to_words};
use crate::db::{DocumentId, DocumentRepository, RepositoryError};
use crate::models::{
    ClientInfo, DocumentBody, DocumentKind, DocumentMeta, DocumentPayload, DocumentStatus,
    ItemUpdate, ReceiptDetails, StoredDocument, Totals,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    /// In-memory changes not yet handed to the store.
    Draft,
    /// A save was handed to the store and has not completed.
    Saving,
    /// Matches the stored record `id`.
    Persisted { id: DocumentId },
}

/// Closed set of document-level edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Number(String),
    Date(NaiveDate),
    Status(DocumentStatus),
    Notes(String),
    ClientName(String),
    ClientTaxId(String),
    ClientAddress(String),
    ClientPhone(String),
    ClientEmail(String),
    /// Receipts only.
    Concept(String),
    /// Receipts only.
    PaymentMethod(String),
    /// Delivery notes only; a data URL of the captured signature.
    Signature(Option<String>),
}

impl FieldUpdate {
    fn field_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Date(_) => "date",
            Self::Status(_) => "status",
            Self::Notes(_) => "notes",
            Self::ClientName(_) => "client_name",
            Self::ClientTaxId(_) => "client_tax_id",
            Self::ClientAddress(_) => "client_address",
            Self::ClientPhone(_) => "client_phone",
            Self::ClientEmail(_) => "client_email",
            Self::Concept(_) => "concept",
            Self::PaymentMethod(_) => "payment_method",
            Self::Signature(_) => "signature",
        }
    }
}

/// What the store should do with the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistRequest {
    /// First save; the store assigns the id and creation time.
    Create(DocumentPayload),
    /// Later saves replace the record's payload.
    Update {
        id: DocumentId,
        payload: DocumentPayload,
    },
}

impl PersistRequest {
    pub fn payload(&self) -> &DocumentPayload {
        match self {
            Self::Create(payload) | Self::Update { payload, .. } => payload,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("{0:?} documents have no line items")]
    NotItemized(DocumentKind),

    #[error("{0:?} documents have no receipt amount")]
    NotReceipt(DocumentKind),

    #[error("field '{field}' does not apply to {kind:?} documents")]
    FieldNotApplicable {
        field: &'static str,
        kind: DocumentKind,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Words(#[from] WordsError),

    #[error("a save is already in progress")]
    SaveInProgress,

    #[error("no save in progress")]
    NotSaving,

    #[error("could not save document: {0}")]
    Persistence(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEditorState {
    payload: DocumentPayload,
    phase: EditorPhase,
    record_id: Option<DocumentId>,
}

impl DocumentEditorState {
    /// A fresh "new document" editor dated `date`.
    pub fn new(
        kind: DocumentKind,
        date: NaiveDate,
    ) -> Self {
        Self {
            payload: DocumentPayload {
                kind,
                meta: DocumentMeta::new(date),
                client: ClientInfo::default(),
                body: DocumentBody::for_kind(kind),
                signature: None,
            },
            phase: EditorPhase::Draft,
            record_id: None,
        }
    }

    /// An editor over a record loaded from the store.
    pub fn from_stored(stored: StoredDocument) -> Self {
        Self {
            payload: stored.payload,
            phase: EditorPhase::Persisted { id: stored.id },
            record_id: Some(stored.id),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.payload.kind
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn payload(&self) -> &DocumentPayload {
        &self.payload
    }

    /// Id of the stored record this draft belongs to, if it was ever saved.
    pub fn record_id(&self) -> Option<DocumentId> {
        self.record_id
    }

    pub fn ledger(&self) -> Option<&Ledger> {
        match &self.payload.body {
            DocumentBody::Itemized(ledger) => Some(ledger),
            DocumentBody::Receipt(_) => None,
        }
    }

    pub fn receipt(&self) -> Option<&ReceiptDetails> {
        match &self.payload.body {
            DocumentBody::Receipt(receipt) => Some(receipt),
            DocumentBody::Itemized(_) => None,
        }
    }

    pub fn totals(&self) -> Option<Totals> {
        self.ledger().map(Ledger::totals)
    }

    // ── edits ────────────────────────────────────────────────────────────

    pub fn on_field_change(
        &mut self,
        update: FieldUpdate,
    ) -> Result<(), EditorError> {
        self.ensure_editable()?;
        let kind = self.payload.kind;
        let field = update.field_name();
        let not_applicable = EditorError::FieldNotApplicable { field, kind };

        match update {
            FieldUpdate::Number(number) => self.payload.meta.number = number,
            FieldUpdate::Date(date) => self.payload.meta.date = date,
            FieldUpdate::Status(status) => self.payload.meta.status = status,
            FieldUpdate::Notes(notes) => {
                self.payload.meta.notes = Some(notes).filter(|n| !n.trim().is_empty())
            }
            FieldUpdate::ClientName(name) => self.payload.client.name = name,
            FieldUpdate::ClientTaxId(tax_id) => self.payload.client.tax_id = tax_id,
            FieldUpdate::ClientAddress(address) => self.payload.client.address = address,
            FieldUpdate::ClientPhone(phone) => self.payload.client.phone = phone,
            FieldUpdate::ClientEmail(email) => self.payload.client.email = email,
            FieldUpdate::Concept(concept) => {
                self.receipt_mut().ok_or(not_applicable)?.concept = concept
            }
            FieldUpdate::PaymentMethod(method) => {
                self.receipt_mut().ok_or(not_applicable)?.payment_method =
                    Some(method).filter(|m| !m.trim().is_empty())
            }
            FieldUpdate::Signature(signature) => {
                if kind != DocumentKind::DeliveryNote {
                    return Err(not_applicable);
                }
                self.payload.signature = signature;
            }
        }
        self.touch();
        Ok(())
    }

    /// Applies an edit to one line item and returns the refreshed totals.
    pub fn on_item_change(
        &mut self,
        id: u32,
        update: ItemUpdate,
    ) -> Result<Totals, EditorError> {
        self.ensure_editable()?;
        let ledger = self.ledger_mut()?;
        ledger.update_item(id, update)?;
        let totals = ledger.totals();
        self.touch();
        Ok(totals)
    }

    /// Appends a blank line item and returns its id.
    pub fn on_add_item(&mut self) -> Result<u32, EditorError> {
        self.ensure_editable()?;
        let id = self.ledger_mut()?.add_item();
        self.touch();
        Ok(id)
    }

    /// Removes a line item; `Ok(false)` when it was the last one.
    pub fn on_remove_item(
        &mut self,
        id: u32,
    ) -> Result<bool, EditorError> {
        self.ensure_editable()?;
        let removed = self.ledger_mut()?.remove_item(id);
        if removed {
            self.touch();
        } else {
            debug!(id, "line item kept");
        }
        Ok(removed)
    }

    /// Sets the receipt amount from operator text and, unless the words were
    /// typed by hand, regenerates the cantidad en letras.
    ///
    /// When the amount cannot be spelled the amount is still stored, the
    /// generated words are cleared and the [`WordsError`] is returned.
    pub fn on_amount_change(
        &mut self,
        text: &str,
    ) -> Result<(), EditorError> {
        self.ensure_editable()?;
        let kind = self.payload.kind;
        let receipt = self.receipt_mut().ok_or(EditorError::NotReceipt(kind))?;
        receipt.amount = coerce_decimal(text);
        let spelled = if receipt.words_overridden {
            Ok(())
        } else {
            refresh_words(receipt)
        };
        self.touch();
        spelled
    }

    /// Replaces the generated words with the operator's own text.
    pub fn override_words(
        &mut self,
        words: String,
    ) -> Result<(), EditorError> {
        self.ensure_editable()?;
        let kind = self.payload.kind;
        let receipt = self.receipt_mut().ok_or(EditorError::NotReceipt(kind))?;
        receipt.amount_in_words = words;
        receipt.words_overridden = true;
        self.touch();
        Ok(())
    }

    /// Drops a manual override and regenerates the words from the amount.
    pub fn reset_words(&mut self) -> Result<(), EditorError> {
        self.ensure_editable()?;
        let kind = self.payload.kind;
        let receipt = self.receipt_mut().ok_or(EditorError::NotReceipt(kind))?;
        receipt.words_overridden = false;
        let spelled = refresh_words(receipt);
        self.touch();
        spelled
    }

    // ── persistence ──────────────────────────────────────────────────────

    /// The payload in the shape the store expects, as a create on first
    /// save and an update of the known record afterwards.
    pub fn to_persistable_payload(&self) -> PersistRequest {
        match self.record_id {
            None => PersistRequest::Create(self.payload.clone()),
            Some(id) => PersistRequest::Update {
                id,
                payload: self.payload.clone(),
            },
        }
    }

    /// Moves to [`EditorPhase::Saving`] and hands out what to persist.
    pub fn begin_save(&mut self) -> Result<PersistRequest, EditorError> {
        if self.phase == EditorPhase::Saving {
            return Err(EditorError::SaveInProgress);
        }
        self.phase = EditorPhase::Saving;
        Ok(self.to_persistable_payload())
    }

    /// Records the store's answer. A failure returns the editor to
    /// [`EditorPhase::Draft`] with its edits intact; nothing is retried.
    pub fn finish_save(
        &mut self,
        outcome: Result<DocumentId, RepositoryError>,
    ) -> Result<DocumentId, EditorError> {
        if self.phase != EditorPhase::Saving {
            return Err(EditorError::NotSaving);
        }
        match outcome {
            Ok(id) => {
                self.phase = EditorPhase::Persisted { id };
                self.record_id = Some(id);
                Ok(id)
            }
            Err(e) => {
                self.phase = EditorPhase::Draft;
                Err(EditorError::Persistence(e))
            }
        }
    }

    /// Saves through `repo` in one step.
    pub async fn save(
        &mut self,
        repo: &dyn DocumentRepository,
    ) -> Result<DocumentId, EditorError> {
        let request = self.begin_save()?;
        let collection = self.kind().collection();

        let outcome = match &request {
            PersistRequest::Create(payload) => repo.create(collection, payload).await,
            PersistRequest::Update { id, payload } => repo
                .update(collection, *id, payload)
                .await
                .map(|()| *id),
        };

        match &outcome {
            Ok(id) => info!(collection = collection.as_str(), id, "document saved"),
            Err(error) => warn!(collection = collection.as_str(), %error, "document save failed"),
        }
        self.finish_save(outcome)
    }

    // ── helpers ──────────────────────────────────────────────────────────

    fn ensure_editable(&self) -> Result<(), EditorError> {
        match self.phase {
            EditorPhase::Saving => Err(EditorError::SaveInProgress),
            EditorPhase::Draft | EditorPhase::Persisted { .. } => Ok(()),
        }
    }

    /// Called once an edit has been applied; a persisted document becomes a
    /// draft of the same record.
    fn touch(&mut self) {
        if let EditorPhase::Persisted { id } = self.phase {
            debug!(id, "persisted document edited");
            self.phase = EditorPhase::Draft;
        }
    }

    fn ledger_mut(&mut self) -> Result<&mut Ledger, EditorError> {
        match &mut self.payload.body {
            DocumentBody::Itemized(ledger) => Ok(ledger),
            DocumentBody::Receipt(_) => Err(EditorError::NotItemized(self.payload.kind)),
        }
    }

    fn receipt_mut(&mut self) -> Option<&mut ReceiptDetails> {
        match &mut self.payload.body {
            DocumentBody::Receipt(receipt) => Some(receipt),
            DocumentBody::Itemized(_) => None,
        }
    }
}

fn refresh_words(receipt: &mut ReceiptDetails) -> Result<(), EditorError> {
    match to_words(receipt.amount) {
        Ok(words) => {
            receipt.amount_in_words = words;
            Ok(())
        }
        Err(e) => {
            receipt.amount_in_words.clear();
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::db::Collection;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
    }

    // ── recording store ──────────────────────────────────────────────────
    #[derive(Default)]
    struct RecordingRepository {
        calls: Mutex<Vec<(Collection, Option<DocumentId>, DocumentPayload)>>,
        fail_with: Option<RepositoryError>,
    }

    impl RecordingRepository {
        fn failing(error: RepositoryError) -> Self {
            Self {
                fail_with: Some(error),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(Collection, Option<DocumentId>, DocumentPayload)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DocumentRepository for RecordingRepository {
        async fn create(
            &self,
            collection: Collection,
            payload: &DocumentPayload,
        ) -> Result<DocumentId, RepositoryError> {
            if let Some(e) = &self.fail_with {
                return Err(e.clone());
            }
            let mut calls = self.calls.lock().unwrap();
            calls.push((collection, None, payload.clone()));
            Ok(41 + calls.len() as i64)
        }
        async fn get_by_id(
            &self,
            _collection: Collection,
            _id: DocumentId,
        ) -> Result<StoredDocument, RepositoryError> {
            Err(RepositoryError::NotFound)
        }
        async fn update(
            &self,
            collection: Collection,
            id: DocumentId,
            payload: &DocumentPayload,
        ) -> Result<(), RepositoryError> {
            if let Some(e) = &self.fail_with {
                return Err(e.clone());
            }
            self.calls
                .lock()
                .unwrap()
                .push((collection, Some(id), payload.clone()));
            Ok(())
        }
        async fn delete(
            &self,
            _collection: Collection,
            _id: DocumentId,
        ) -> Result<(), RepositoryError> {
            Ok(())
        }
        async fn list_ordered_by_creation(
            &self,
            _collection: Collection,
        ) -> Result<Vec<StoredDocument>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    // =========================================================================
    // line item tests
    // =========================================================================

    #[test]
    fn quote_items_recompute_on_every_edit() {
        let mut editor = DocumentEditorState::new(DocumentKind::Quote, today());

        editor
            .on_item_change(1, ItemUpdate::Quantity("2".into()))
            .unwrap();
        editor
            .on_item_change(1, ItemUpdate::UnitPrice("100".into()))
            .unwrap();
        let second = editor.on_add_item().unwrap();
        editor
            .on_item_change(second, ItemUpdate::Quantity("1".into()))
            .unwrap();
        let totals = editor
            .on_item_change(second, ItemUpdate::UnitPrice("50".into()))
            .unwrap();

        assert_eq!(second, 2);
        assert_eq!(totals.subtotal, dec!(250));
        assert_eq!(totals.tax, Some(dec!(52.5)));
        assert_eq!(totals.total, dec!(302.5));
        assert_eq!(editor.totals(), Some(totals));
    }

    #[test]
    fn removing_last_item_keeps_it() {
        let mut editor = DocumentEditorState::new(DocumentKind::Statement, today());
        editor
            .on_item_change(1, ItemUpdate::Amount("80".into()))
            .unwrap();

        let removed = editor.on_remove_item(1).unwrap();

        assert!(!removed);
        assert_eq!(editor.ledger().unwrap().items().len(), 1);
        assert_eq!(editor.totals().unwrap().total, dec!(80));
    }

    #[test]
    fn receipts_have_no_line_items() {
        let mut editor = DocumentEditorState::new(DocumentKind::Receipt, today());

        assert_eq!(
            editor.on_add_item(),
            Err(EditorError::NotItemized(DocumentKind::Receipt))
        );
        assert_eq!(editor.totals(), None);
    }

    #[test]
    fn ledger_errors_surface_through_editor() {
        let mut editor = DocumentEditorState::new(DocumentKind::DeliveryNote, today());

        let result = editor.on_item_change(1, ItemUpdate::Amount("5".into()));

        assert!(matches!(
            result,
            Err(EditorError::Ledger(LedgerError::NotApplicable { .. }))
        ));
    }

    // =========================================================================
    // receipt tests
    // =========================================================================

    #[test]
    fn amount_change_generates_words() {
        let mut editor = DocumentEditorState::new(DocumentKind::Receipt, today());

        editor.on_amount_change("1500,50").unwrap();

        let receipt = editor.receipt().unwrap();
        assert_eq!(receipt.amount, dec!(1500.50));
        assert_eq!(receipt.amount_in_words, "Mil quinientos pesos con 50/100");
    }

    #[test]
    fn manual_words_survive_amount_changes_until_reset() {
        let mut editor = DocumentEditorState::new(DocumentKind::Receipt, today());
        editor.on_amount_change("15").unwrap();
        editor
            .override_words("Quince pesos exactos".to_string())
            .unwrap();

        editor.on_amount_change("16").unwrap();
        assert_eq!(editor.receipt().unwrap().amount_in_words, "Quince pesos exactos");

        editor.reset_words().unwrap();
        assert_eq!(editor.receipt().unwrap().amount_in_words, "Dieciséis pesos");
        assert!(!editor.receipt().unwrap().words_overridden);
    }

    #[test]
    fn unspellable_amount_is_kept_and_reported() {
        let mut editor = DocumentEditorState::new(DocumentKind::Receipt, today());
        editor.on_amount_change("10").unwrap();

        let result = editor.on_amount_change("1000000000");

        assert_eq!(
            result,
            Err(EditorError::Words(WordsError::OutOfRange(dec!(1000000000))))
        );
        let receipt = editor.receipt().unwrap();
        assert_eq!(receipt.amount, dec!(1000000000));
        assert_eq!(receipt.amount_in_words, "");
    }

    #[test]
    fn garbage_amount_reads_as_zero() {
        let mut editor = DocumentEditorState::new(DocumentKind::Receipt, today());

        editor.on_amount_change("mil").unwrap();

        assert_eq!(editor.receipt().unwrap().amount, Decimal::ZERO);
        assert_eq!(editor.receipt().unwrap().amount_in_words, "Cero pesos");
    }

    #[test]
    fn amount_change_on_quote_is_rejected() {
        let mut editor = DocumentEditorState::new(DocumentKind::Quote, today());

        assert_eq!(
            editor.on_amount_change("10"),
            Err(EditorError::NotReceipt(DocumentKind::Quote))
        );
    }

    // =========================================================================
    // field tests
    // =========================================================================

    #[test]
    fn field_changes_update_meta_and_client() {
        let mut editor = DocumentEditorState::new(DocumentKind::Quote, today());

        editor
            .on_field_change(FieldUpdate::Number("0001-00000042".into()))
            .unwrap();
        editor
            .on_field_change(FieldUpdate::ClientName("Talleres Norte SRL".into()))
            .unwrap();
        editor
            .on_field_change(FieldUpdate::Status(DocumentStatus::Approved))
            .unwrap();
        editor.on_field_change(FieldUpdate::Notes("  ".into())).unwrap();

        let payload = editor.payload();
        assert_eq!(payload.meta.number, "0001-00000042");
        assert_eq!(payload.client.name, "Talleres Norte SRL");
        assert_eq!(payload.meta.status, DocumentStatus::Approved);
        assert_eq!(payload.meta.notes, None);
    }

    #[test]
    fn receipt_only_fields_are_rejected_elsewhere() {
        let mut editor = DocumentEditorState::new(DocumentKind::Statement, today());

        assert_eq!(
            editor.on_field_change(FieldUpdate::Concept("Pago".into())),
            Err(EditorError::FieldNotApplicable {
                field: "concept",
                kind: DocumentKind::Statement,
            })
        );
    }

    #[test]
    fn signature_belongs_to_delivery_notes() {
        let mut remito = DocumentEditorState::new(DocumentKind::DeliveryNote, today());
        let mut quote = DocumentEditorState::new(DocumentKind::Quote, today());
        let signature = Some("data:image/png;base64,AAAA".to_string());

        remito
            .on_field_change(FieldUpdate::Signature(signature.clone()))
            .unwrap();

        assert_eq!(remito.payload().signature, signature);
        assert!(quote
            .on_field_change(FieldUpdate::Signature(signature))
            .is_err());
    }

    // =========================================================================
    // lifecycle tests
    // =========================================================================

    #[tokio::test]
    async fn first_save_creates_then_updates() {
        let repo = RecordingRepository::default();
        let mut editor = DocumentEditorState::new(DocumentKind::Statement, today());
        editor
            .on_item_change(1, ItemUpdate::Amount("100".into()))
            .unwrap();

        assert!(matches!(editor.to_persistable_payload(), PersistRequest::Create(_)));
        let id = editor.save(&repo).await.unwrap();
        assert_eq!(editor.phase(), EditorPhase::Persisted { id });

        editor
            .on_item_change(1, ItemUpdate::Amount("120".into()))
            .unwrap();
        assert_eq!(editor.phase(), EditorPhase::Draft);
        assert_eq!(editor.save(&repo).await.unwrap(), id);

        let calls = repo.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, Collection::Statements);
        assert_eq!(calls[0].1, None);
        assert_eq!(calls[1].1, Some(id));
        assert_eq!(calls[1].2.total(), dec!(120));
    }

    #[tokio::test]
    async fn failed_save_returns_to_draft() {
        let repo = RecordingRepository::failing(RepositoryError::Connection("offline".into()));
        let mut editor = DocumentEditorState::new(DocumentKind::Receipt, today());

        let result = editor.save(&repo).await;

        assert_eq!(
            result,
            Err(EditorError::Persistence(RepositoryError::Connection(
                "offline".into()
            )))
        );
        assert_eq!(editor.phase(), EditorPhase::Draft);
        assert_eq!(editor.record_id(), None);
    }

    #[test]
    fn edits_are_refused_while_saving() {
        let mut editor = DocumentEditorState::new(DocumentKind::Quote, today());
        editor.begin_save().unwrap();

        assert_eq!(editor.on_add_item(), Err(EditorError::SaveInProgress));
        assert_eq!(editor.begin_save(), Err(EditorError::SaveInProgress));

        assert_eq!(editor.finish_save(Ok(7)), Ok(7));
        assert_eq!(editor.finish_save(Ok(7)), Err(EditorError::NotSaving));
    }

    fn persisted(kind: DocumentKind, id: DocumentId) -> DocumentEditorState {
        let draft = DocumentEditorState::new(kind, today());
        DocumentEditorState::from_stored(StoredDocument {
            id,
            payload: draft.payload().clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[test]
    fn rejected_edits_leave_persisted_record_clean() {
        let mut receipt = persisted(DocumentKind::Receipt, 3);
        let mut quote = persisted(DocumentKind::Quote, 4);

        assert_eq!(
            receipt.on_add_item(),
            Err(EditorError::NotItemized(DocumentKind::Receipt))
        );
        assert!(quote
            .on_field_change(FieldUpdate::Concept("Anticipo".into()))
            .is_err());
        assert!(quote
            .on_item_change(1, ItemUpdate::Amount("5".into()))
            .is_err());
        assert_eq!(
            quote.on_item_change(99, ItemUpdate::Quantity("1".into())),
            Err(EditorError::Ledger(LedgerError::UnknownItem(99)))
        );
        assert_eq!(quote.on_remove_item(1), Ok(false));

        assert_eq!(receipt.phase(), EditorPhase::Persisted { id: 3 });
        assert_eq!(quote.phase(), EditorPhase::Persisted { id: 4 });
    }

    #[test]
    fn applied_edit_turns_persisted_record_into_draft() {
        let mut quote = persisted(DocumentKind::Quote, 4);
        let mut receipt = persisted(DocumentKind::Receipt, 5);

        quote
            .on_field_change(FieldUpdate::ClientName("Talleres Norte SRL".into()))
            .unwrap();
        // Stored even though it cannot be spelled.
        assert!(receipt.on_amount_change("1000000000").is_err());

        assert_eq!(quote.phase(), EditorPhase::Draft);
        assert_eq!(quote.record_id(), Some(4));
        assert_eq!(receipt.phase(), EditorPhase::Draft);
        assert!(matches!(
            receipt.to_persistable_payload(),
            PersistRequest::Update { id: 5, .. }
        ));
    }

    #[test]
    fn stored_documents_open_as_persisted_updates() {
        let draft = DocumentEditorState::new(DocumentKind::Quote, today());
        let stored = StoredDocument {
            id: 9,
            payload: draft.payload().clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let editor = DocumentEditorState::from_stored(stored);

        assert_eq!(editor.phase(), EditorPhase::Persisted { id: 9 });
        assert!(matches!(
            editor.to_persistable_payload(),
            PersistRequest::Update { id: 9, .. }
        ));
    }
}
