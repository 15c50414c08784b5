use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sincorp_core::{
    Collection, DocumentId, DocumentPayload, DocumentRepository, RepositoryError, StoredDocument,
};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::{debug, info};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens `database_url`, which may be a bare file path (created when
    /// missing), a `sqlite:` URL or `:memory:`.
    pub async fn new(database_url: &str) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| RepositoryError::Configuration(format!("{database_url}: {e}")))?
            .create_if_missing(true);

        // An in-memory database lives only as long as its connection.
        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{database_url}: {e}")))?;
        info!(database_url, "opened document store");
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to run migrations: {}", e)))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn encode_payload(payload: &DocumentPayload) -> Result<String, RepositoryError> {
    serde_json::to_string(payload).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

fn row_to_stored_document(row: &SqliteRow) -> Result<StoredDocument, RepositoryError> {
    let payload: String = row
        .try_get("payload")
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

    Ok(StoredDocument {
        id: row
            .try_get("id")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        payload: serde_json::from_str(&payload)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get created_at: {}", e)))?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get updated_at: {}", e)))?,
    })
}

#[async_trait]
impl DocumentRepository for SqliteRepository {
    async fn create(
        &self,
        collection: Collection,
        payload: &DocumentPayload,
    ) -> Result<DocumentId, RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO documents (collection, payload, created_at, updated_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(collection.as_str())
        .bind(encode_payload(payload)?)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        debug!(collection = collection.as_str(), id, "inserted document");
        Ok(id)
    }

    async fn get_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<StoredDocument, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, payload, created_at, updated_at
             FROM documents WHERE collection = ? AND id = ?",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        row_to_stored_document(&row)
    }

    async fn update(
        &self,
        collection: Collection,
        id: DocumentId,
        payload: &DocumentPayload,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE documents SET payload = ?, updated_at = ?
             WHERE collection = ? AND id = ?",
        )
        .bind(encode_payload(payload)?)
        .bind(Utc::now())
        .bind(collection.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        debug!(collection = collection.as_str(), id, "updated document");
        Ok(())
    }

    async fn delete(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        debug!(collection = collection.as_str(), id, "deleted document");
        Ok(())
    }

    async fn list_ordered_by_creation(
        &self,
        collection: Collection,
    ) -> Result<Vec<StoredDocument>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, payload, created_at, updated_at
             FROM documents WHERE collection = ?
             ORDER BY created_at DESC, id DESC",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_stored_document).collect()
    }
}
