use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::debug;

use super::repository::{DocumentRepository, RepositoryError};

/// Which document store to open and where.
///
/// `backend` names a [`RepositoryFactory`] registered with the
/// [`RepositoryRegistry`]; `connection_string` means whatever that backend
/// makes of it. For `sqlite` it is a file path such as `sincorp.db`, or
/// `:memory:` for a throwaway store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        }
    }
}

/// Opens one kind of document store.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    fn backend_name(&self) -> &'static str;

    /// Opens the store, creating and migrating it when needed.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn DocumentRepository>, RepositoryError>;
}

/// The document stores the admin tool can open, by backend name.
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: BTreeMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a backend. A later factory with the same name wins.
    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        let name = factory.backend_name();
        if self.factories.insert(name, factory).is_some() {
            debug!(backend = name, "store backend replaced");
        }
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    /// Opens the store `config` names.
    ///
    /// An unregistered backend is a [`RepositoryError::Configuration`] that
    /// lists the registered ones. Factory errors pass through unchanged.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn DocumentRepository>, RepositoryError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(RepositoryError::Configuration(format!(
                "no document store backend named '{}' (registered: {})",
                config.backend,
                self.available_backends().join(", ")
            )));
        };

        debug!(backend = %config.backend, "opening document store");
        factory.create(config).await
    }
}
