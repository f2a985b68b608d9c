pub mod analytics;
pub mod mutation;

use charybdis::macros::charybdis_model;
use charybdis::types::{BigInt, Double, Frozen, List, Text, Timestamp, Uuid};
use serde::{Deserialize, Serialize};

use crate::db::store::ProductStore;
use crate::errors::ProdsnapError;
use crate::models::udts::ProductVersion;
use crate::versioning::VersionLabel;

/// The mutable aggregate root. Current-state fields always mirror the most
/// recently appended version that set them; `versions` is append-only and
/// its list position is the authoritative version order.
///
/// The whole aggregate lives in a single partition so that "append a
/// version and patch the current state" can be one atomic update.
#[charybdis_model(
    table_name = products,
    partition_keys = [id],
    clustering_keys = [],
)]
#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct Product {
    #[serde(default)]
    pub id: Uuid,

    pub name: Text,

    pub description: Text,

    pub price: Double,

    pub image: Option<Text>,

    #[serde(rename = "createdAt", default = "chrono::Utc::now")]
    pub created_at: Timestamp,

    #[serde(rename = "updatedAt", default = "chrono::Utc::now")]
    pub updated_at: Timestamp,

    /// Bumped by one on every committed mutation; the compare value for
    /// optimistic concurrency. Timestamps are too coarse for that job, two
    /// commits can land in the same millisecond.
    #[serde(skip)]
    pub lock_version: BigInt,

    #[serde(default)]
    pub versions: List<Frozen<ProductVersion>>,
}

pub struct CreateProduct {
    pub id: Uuid,
    pub name: Text,
    pub description: Text,
    pub price: Double,
    pub image: Option<Text>,
    pub created_by: Text,
}

impl Product {
    /// Builds the aggregate with its initial `1.0` version and persists it.
    ///
    /// The initial version snapshots the submitted fields, so reverting to
    /// `1.0` later restores the creation state.
    pub async fn create<S: ProductStore>(
        store: &S,
        params: CreateProduct,
    ) -> Result<Product, ProdsnapError> {
        let now = chrono::Utc::now();

        let initial_version = ProductVersion {
            id: Uuid::new_v4(),
            version_number: VersionLabel::INITIAL.to_string(),
            title: Some(params.name.clone()),
            description: Some(params.description.clone()),
            price: Some(params.price),
            image: params.image.clone(),
            changes: "Initial version".to_string(),
            created_by: params.created_by,
            created_at: now,
            is_revert: false,
            reverted_from_version: None,
        };

        let product = Product {
            id: params.id,
            name: params.name,
            description: params.description,
            price: params.price,
            image: params.image,
            created_at: now,
            updated_at: now,
            lock_version: 0,
            versions: vec![initial_version],
        };

        store.insert_product(&product).await?;

        Ok(product)
    }

    pub fn find_version(&self, version_id: Uuid) -> Option<&ProductVersion> {
        self.versions.iter().find(|v| v.id == version_id)
    }
}
