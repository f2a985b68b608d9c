use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use charybdis::types::Uuid;

use crate::db::store::{ProductStore, StatePatch};
use crate::errors::ProdsnapError;
use crate::models::product::Product;
use crate::models::udts::ProductVersion;

/// In-memory `ProductStore` for engine tests. Honours the same `lock_version`
/// compare rule as the Scylla store and can fail the next commit on demand,
/// so conflict and atomicity properties are testable without a cluster.
#[derive(Default)]
pub struct MemoryStore {
    products: Mutex<HashMap<Uuid, Product>>,
    fail_next_commit: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    pub fn product(&self, id: Uuid) -> Option<Product> {
        self.products.lock().unwrap().get(&id).cloned()
    }
}

impl ProductStore for MemoryStore {
    async fn find_product(&self, id: Uuid) -> Result<Product, ProdsnapError> {
        self.products
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ProdsnapError::NotFound(format!("Product {} not found", id)))
    }

    async fn insert_product(&self, product: &Product) -> Result<(), ProdsnapError> {
        self.products
            .lock()
            .unwrap()
            .insert(product.id, product.clone());

        Ok(())
    }

    async fn append_version_and_patch_state(
        &self,
        product: &Product,
        version: &ProductVersion,
        patch: &StatePatch,
    ) -> Result<(), ProdsnapError> {
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(ProdsnapError::CommitFailed(
                "injected commit failure".to_string(),
            ));
        }

        let mut products = self.products.lock().unwrap();
        let stored = products
            .get_mut(&product.id)
            .ok_or_else(|| ProdsnapError::NotFound(format!("Product {} not found", product.id)))?;

        if stored.lock_version != product.lock_version {
            return Err(ProdsnapError::Conflict(
                "Product was modified concurrently, reload and retry".to_string(),
            ));
        }

        stored.lock_version += 1;
        stored.versions.push(version.clone());

        if let Some(name) = &patch.name {
            stored.name = name.clone();
        }
        if let Some(description) = &patch.description {
            stored.description = description.clone();
        }
        if let Some(price) = patch.price {
            stored.price = price;
        }
        if let Some(image) = &patch.image {
            stored.image = Some(image.clone());
        }
        stored.updated_at = patch.updated_at;

        Ok(())
    }

    async fn delete_product(&self, id: Uuid) -> Result<u64, ProdsnapError> {
        match self.products.lock().unwrap().remove(&id) {
            Some(_) => Ok(1),
            None => Err(ProdsnapError::NotFound(format!("Product {} not found", id))),
        }
    }

    async fn list_products(&self) -> Result<Vec<Product>, ProdsnapError> {
        Ok(self.products.lock().unwrap().values().cloned().collect())
    }
}
