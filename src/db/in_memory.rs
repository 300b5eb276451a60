use crate::db::errors::{DBError, InMemoryError};
use crate::db::product::{MonitoredProduct, ProductData, SyncStatus};
use crate::db::sync_queue::QueuedOperation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::sync::RwLock;
use time::OffsetDateTime;
use tracing::info;

/// On-disk seed format. Only products and the two dashboard flags are
/// persisted; the sync queue always starts empty.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FileStructure {
    #[serde(default)]
    pub products: Vec<MonitoredProduct>,
    #[serde(default)]
    pub visited: bool,
    #[serde(default)]
    pub onboarding_dismissed: bool,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    pub products: RwLock<HashMap<String, MonitoredProduct>>,
    pub sync_queue: RwLock<HashMap<String, QueuedOperation>>,
    pub visited: RwLock<bool>,
    pub onboarding_dismissed: RwLock<bool>,
}

impl TryFrom<String> for InMemoryStore {
    type Error = DBError;

    fn try_from(file_path: String) -> Result<Self, Self::Error> {
        let data = fs::read_to_string(file_path)
            .map_err(|e| DBError::InMemoryError(InMemoryError::IoError(e)))?;
        let file: FileStructure = serde_json::from_str(&data)
            .map_err(|e| DBError::InMemoryError(InMemoryError::SerdeError(e)))?;
        let products: HashMap<String, MonitoredProduct> = file
            .products
            .into_iter()
            .map(|product| (product.id.clone(), product))
            .collect();
        Ok(Self {
            products: RwLock::new(products),
            sync_queue: RwLock::new(HashMap::new()),
            visited: RwLock::new(file.visited),
            onboarding_dismissed: RwLock::new(file.onboarding_dismissed),
        })
    }
}

impl InMemoryStore {
    pub fn add_product(&self, data: ProductData) -> Result<String, DBError> {
        let product = MonitoredProduct::from_data(data);
        let id = product.id.clone();
        let mut products = self.products.write().unwrap();
        products.insert(id.clone(), product);
        info!(product_id = %id, "product stored locally");
        Ok(id)
    }

    pub fn all_products(&self) -> Result<Vec<MonitoredProduct>, DBError> {
        let products = self.products.read().unwrap();
        Ok(products.values().cloned().collect())
    }

    pub fn get_product_by(&self, id: &str) -> Result<MonitoredProduct, DBError> {
        let products = self.products.read().unwrap();
        products.get(id).cloned().ok_or(DBError::UnknownProduct)
    }

    /// Updating an absent record is a success, not an error.
    pub fn update_status(&self, id: &str, status: SyncStatus) -> Result<(), DBError> {
        let mut products = self.products.write().unwrap();
        if let Some(product) = products.get_mut(id) {
            product.status = status;
            product.version += 1;
            product.updated_at = OffsetDateTime::now_utc();
        }
        Ok(())
    }

    /// Deleting an absent record is a success, not an error.
    pub fn delete_product(&self, id: &str) -> Result<(), DBError> {
        let mut products = self.products.write().unwrap();
        products.remove(id);
        Ok(())
    }

    pub fn count_products(&self) -> Result<usize, DBError> {
        let products = self.products.read().unwrap();
        Ok(products.len())
    }

    /// Flips every pending record to synced and returns the affected ids.
    pub fn mark_pending_synced(&self) -> Result<Vec<String>, DBError> {
        let mut products = self.products.write().unwrap();
        let mut synced = vec![];
        for product in products.values_mut() {
            if product.status == SyncStatus::Pending {
                product.status = SyncStatus::Synced;
                product.version += 1;
                product.updated_at = OffsetDateTime::now_utc();
                synced.push(product.id.clone());
            }
        }
        Ok(synced)
    }

    pub fn has_visited(&self) -> bool {
        *self.visited.read().unwrap()
    }

    pub fn mark_visited(&self) {
        let mut visited = self.visited.write().unwrap();
        *visited = true;
    }

    pub fn is_onboarding_dismissed(&self) -> bool {
        *self.onboarding_dismissed.read().unwrap()
    }

    pub fn dismiss_onboarding(&self) {
        let mut dismissed = self.onboarding_dismissed.write().unwrap();
        *dismissed = true;
    }

    pub fn enqueue_operation(&self, operation: QueuedOperation) -> Result<String, DBError> {
        let id = operation.id.clone();
        let mut queue = self.sync_queue.write().unwrap();
        queue.insert(id.clone(), operation);
        Ok(id)
    }

    pub fn queued_operations(&self) -> Result<Vec<QueuedOperation>, DBError> {
        let queue = self.sync_queue.read().unwrap();
        Ok(queue.values().cloned().collect())
    }

    pub fn clear_queue(&self) -> Result<(), DBError> {
        let mut queue = self.sync_queue.write().unwrap();
        queue.clear();
        Ok(())
    }
}
