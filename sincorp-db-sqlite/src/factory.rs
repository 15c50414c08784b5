use async_trait::async_trait;
use sincorp_core::db::{DbConfig, DocumentRepository, RepositoryError, RepositoryFactory};

use crate::repository::SqliteRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`sincorp_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use sincorp_core::db::RepositoryRegistry;
/// use sincorp_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string` and bring
    /// its schema up to date.
    ///
    /// Accepted connection-string values:
    /// * A bare file path, e.g. `"sincorp.db"`. The file is created if it
    ///   does not exist.
    /// * `":memory:"`, an ephemeral in-memory database (useful for tests).
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn DocumentRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string).await?;
        repo.run_migrations().await?;
        Ok(Box::new(repo))
    }
}
