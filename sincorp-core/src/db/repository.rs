use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DocumentPayload, StoredDocument};

/// Store-assigned record id.
pub type DocumentId = i64;

/// The four collections of the back-office store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Quotes,
    Statements,
    DeliveryNotes,
    Receipts,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quotes => "presupuestos",
            Self::Statements => "estados",
            Self::DeliveryNotes => "remitos",
            Self::Receipts => "recibos",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Document store. Timestamps are assigned by the implementation on
/// create and update; concurrent writers are last-write-wins.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn create(
        &self,
        collection: Collection,
        payload: &DocumentPayload,
    ) -> Result<DocumentId, RepositoryError>;

    async fn get_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<StoredDocument, RepositoryError>;

    /// Replaces the stored payload and refreshes `updated_at`.
    async fn update(
        &self,
        collection: Collection,
        id: DocumentId,
        payload: &DocumentPayload,
    ) -> Result<(), RepositoryError>;

    async fn delete(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<(), RepositoryError>;

    /// Every document in `collection`, newest first.
    async fn list_ordered_by_creation(
        &self,
        collection: Collection,
    ) -> Result<Vec<StoredDocument>, RepositoryError>;
}
