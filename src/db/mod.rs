use crate::configuration::DatabaseSettings;
use crate::db::in_memory::InMemoryStore;
use crate::db::product::{MonitoredProduct, ProductData, SyncStatus};
use crate::db::sync_queue::QueuedOperation;
use crate::errors::AppErrors;

pub mod errors;
pub mod in_memory;
pub mod product;
pub mod sync_queue;

use errors::DBError;
pub use errors::DBError as DatabaseError;

/// All monitored-product state lives in process memory, optionally seeded
/// from a JSON file. Concurrent writers are last-write-wins; there is no
/// conflict detection beyond per-record locking.
#[derive(Debug, Default)]
pub struct Database {
    store: InMemoryStore,
}

impl Database {
    pub fn try_from(settings: &DatabaseSettings) -> Result<Self, AppErrors> {
        settings.check_if_valid()?;
        let store = match settings.seed_path.as_ref() {
            Some(path) => InMemoryStore::try_from(path.to_owned())?,
            None => InMemoryStore::default(),
        };
        Ok(Self { store })
    }

    pub async fn add_product(&self, data: ProductData) -> Result<String, DBError> {
        self.store.add_product(data)
    }

    pub async fn all_products(&self) -> Result<Vec<MonitoredProduct>, DBError> {
        self.store.all_products()
    }

    pub async fn get_product_by(&self, id: &str) -> Result<MonitoredProduct, DBError> {
        self.store.get_product_by(id)
    }

    pub async fn update_status(&self, id: &str, status: SyncStatus) -> Result<(), DBError> {
        self.store.update_status(id, status)
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), DBError> {
        self.store.delete_product(id)
    }

    pub async fn count_products(&self) -> Result<usize, DBError> {
        self.store.count_products()
    }

    pub async fn mark_pending_synced(&self) -> Result<Vec<String>, DBError> {
        self.store.mark_pending_synced()
    }

    pub async fn has_visited(&self) -> bool {
        self.store.has_visited()
    }

    pub async fn mark_visited(&self) {
        self.store.mark_visited()
    }

    pub async fn is_onboarding_dismissed(&self) -> bool {
        self.store.is_onboarding_dismissed()
    }

    pub async fn dismiss_onboarding(&self) {
        self.store.dismiss_onboarding()
    }

    pub async fn enqueue_operation(&self, operation: QueuedOperation) -> Result<String, DBError> {
        self.store.enqueue_operation(operation)
    }

    pub async fn queued_operations(&self) -> Result<Vec<QueuedOperation>, DBError> {
        self.store.queued_operations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_settings_give_empty_database() {
        let db = Database::try_from(&DatabaseSettings::default()).expect("Failed to create db");
        assert_eq!(db.count_products().await.expect("Failed to count"), 0);
    }

    #[test]
    fn missing_seed_file_fails() {
        let settings = DatabaseSettings {
            seed_path: Some("no/such/file.json".to_string()),
        };
        assert!(Database::try_from(&settings).is_err());
    }
}
