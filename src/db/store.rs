use std::sync::Arc;

use charybdis::errors::CharybdisError;
use charybdis::operations::{Delete, Find, Insert};
use charybdis::types::{Double, Text, Timestamp, Uuid};
use scylla::client::caching_session::CachingSession;
use scylla::value::{CqlValue, Row};

use crate::errors::ProdsnapError;
use crate::models::product::Product;
use crate::models::udts::ProductVersion;

/// Current-state fields to write back alongside an appended version.
/// `None` leaves the stored value untouched — this carries the image
/// partial-update rule, and on reverts the same rule for every field the
/// target snapshot left unset.
pub struct StatePatch {
    pub name: Option<Text>,
    pub description: Option<Text>,
    pub price: Option<Double>,
    pub image: Option<Text>,
    pub updated_at: Timestamp,
}

/// Storage collaborator for the mutation engine. Implementations must make
/// `append_version_and_patch_state` atomic: the version append and the
/// current-state patch are either both visible or neither is.
pub trait ProductStore {
    async fn find_product(&self, id: Uuid) -> Result<Product, ProdsnapError>;

    async fn insert_product(&self, product: &Product) -> Result<(), ProdsnapError>;

    /// `product` is the freshly loaded aggregate the mutation was computed
    /// from; its `lock_version` serves as the compare value, so a concurrent
    /// writer cannot interleave and two versions can never share a label.
    /// A timestamp would not do here: two commits can land in the same
    /// millisecond and leave `updated_at` unchanged.
    async fn append_version_and_patch_state(
        &self,
        product: &Product,
        version: &ProductVersion,
        patch: &StatePatch,
    ) -> Result<(), ProdsnapError>;

    async fn delete_product(&self, id: Uuid) -> Result<u64, ProdsnapError>;

    async fn list_products(&self) -> Result<Vec<Product>, ProdsnapError>;
}

const APPEND_VERSION_AND_PATCH_STATE_QUERY: &str = "UPDATE products \
    SET versions = versions + ?, name = ?, description = ?, price = ?, image = ?, \
    updated_at = ?, lock_version = ? \
    WHERE id = ? \
    IF lock_version = ?";

const FIND_ALL_PRODUCTS_QUERY: &str = "SELECT id, name, description, price, image, \
    created_at, updated_at, lock_version, versions FROM products";

#[derive(Clone)]
pub struct ScyllaProductStore {
    db_session: Arc<CachingSession>,
}

impl ScyllaProductStore {
    pub fn new(db_session: Arc<CachingSession>) -> Self {
        Self { db_session }
    }
}

impl ProductStore for ScyllaProductStore {
    async fn find_product(&self, id: Uuid) -> Result<Product, ProdsnapError> {
        Product::find_by_primary_key_value((id,))
            .execute(&self.db_session)
            .await
            .map_err(|e| match e {
                CharybdisError::NotFoundError(_) => {
                    ProdsnapError::NotFound(format!("Product {} not found", id))
                }
                e => e.into(),
            })
    }

    async fn insert_product(&self, product: &Product) -> Result<(), ProdsnapError> {
        product.insert().execute(&self.db_session).await?;

        Ok(())
    }

    async fn append_version_and_patch_state(
        &self,
        product: &Product,
        version: &ProductVersion,
        patch: &StatePatch,
    ) -> Result<(), ProdsnapError> {
        // Unset patch fields fall back to the values we just read; under the
        // `IF lock_version = ?` condition writing the read value back is
        // equivalent to leaving the column untouched.
        let values = (
            vec![version.clone()],
            patch.name.clone().unwrap_or_else(|| product.name.clone()),
            patch
                .description
                .clone()
                .unwrap_or_else(|| product.description.clone()),
            patch.price.unwrap_or(product.price),
            patch.image.clone().or_else(|| product.image.clone()),
            patch.updated_at,
            product.lock_version + 1,
            product.id,
            product.lock_version,
        );

        let result = self
            .db_session
            .execute_unpaged(APPEND_VERSION_AND_PATCH_STATE_QUERY, values)
            .await
            .map_err(|e| ProdsnapError::CommitFailed(e.to_string()))?;

        let rows = result
            .into_rows_result()
            .map_err(|e| ProdsnapError::CommitFailed(e.to_string()))?;
        let row = rows
            .first_row::<Row>()
            .map_err(|e| ProdsnapError::CommitFailed(e.to_string()))?;
        let applied = matches!(row.columns.first(), Some(Some(CqlValue::Boolean(true))));

        if !applied {
            // The condition failed: either the product vanished or another
            // writer won this append slot. Reject-on-conflict; the caller
            // retries against the refreshed state.
            self.find_product(product.id).await?;

            return Err(ProdsnapError::Conflict(
                "Product was modified concurrently, reload and retry".to_string(),
            ));
        }

        Ok(())
    }

    async fn delete_product(&self, id: Uuid) -> Result<u64, ProdsnapError> {
        let product = self.find_product(id).await?;

        product.delete().execute(&self.db_session).await?;

        Ok(1)
    }

    async fn list_products(&self) -> Result<Vec<Product>, ProdsnapError> {
        let result = self
            .db_session
            .execute_unpaged(FIND_ALL_PRODUCTS_QUERY, ())
            .await
            .map_err(|e| ProdsnapError::InternalServerError(e.to_string()))?;

        let rows = result
            .into_rows_result()
            .map_err(|e| ProdsnapError::InternalServerError(e.to_string()))?;

        let mut products = Vec::new();
        for product in rows
            .rows::<Product>()
            .map_err(|e| ProdsnapError::InternalServerError(e.to_string()))?
        {
            products.push(product.map_err(|e| ProdsnapError::InternalServerError(e.to_string()))?);
        }

        Ok(products)
    }
}
