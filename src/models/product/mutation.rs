use charybdis::types::{Double, Text, Uuid};

use crate::db::store::{ProductStore, StatePatch};
use crate::errors::ProdsnapError;
use crate::models::product::Product;
use crate::models::udts::ProductVersion;
use crate::versioning::{next_version_label, VersionLabel};

/// Creator recorded on versions the system appends on its own behalf.
pub const SYSTEM_ACTOR: &str = "System";

pub struct EditProduct {
    pub title: Text,
    pub description: Text,
    pub price: Double,
    /// `None` means no image was submitted with this edit; the current
    /// image stays in place (image upload is optional per edit, unlike the
    /// text and price fields).
    pub image: Option<Text>,
    pub created_by: Text,
    pub changes: Text,
}

impl Product {
    /// Appends an edit version and patches the current state, atomically.
    /// Returns the new version's label.
    pub async fn edit<S: ProductStore>(
        store: &S,
        product_id: Uuid,
        edit: EditProduct,
    ) -> Result<VersionLabel, ProdsnapError> {
        let product = store.find_product(product_id).await?;
        let label = next_version_label(&product.versions)?;
        let now = chrono::Utc::now();

        let version = ProductVersion {
            id: Uuid::new_v4(),
            version_number: label.to_string(),
            title: Some(edit.title.clone()),
            description: Some(edit.description.clone()),
            price: Some(edit.price),
            image: edit.image.clone(),
            changes: edit.changes,
            created_by: edit.created_by,
            created_at: now,
            is_revert: false,
            reverted_from_version: None,
        };

        let patch = StatePatch {
            name: Some(edit.title),
            description: Some(edit.description),
            price: Some(edit.price),
            image: edit.image,
            updated_at: now,
        };

        store
            .append_version_and_patch_state(&product, &version, &patch)
            .await?;

        Ok(label)
    }

    /// Reverts by appending a new version that copies the target's snapshot
    /// verbatim. History never shrinks; the sequence only moves forward, so
    /// reverting a revert is just another append.
    pub async fn revert<S: ProductStore>(
        store: &S,
        product_id: Uuid,
        version_id: Uuid,
    ) -> Result<VersionLabel, ProdsnapError> {
        let product = store.find_product(product_id).await?;
        let target = product
            .find_version(version_id)
            .ok_or_else(|| ProdsnapError::NotFound(format!("Version {} not found", version_id)))?;
        let label = next_version_label(&product.versions)?;
        let now = chrono::Utc::now();

        let version = ProductVersion {
            id: Uuid::new_v4(),
            version_number: label.to_string(),
            title: target.title.clone(),
            description: target.description.clone(),
            price: target.price,
            image: target.image.clone(),
            changes: format!("Reverted to {}", target.version_number),
            created_by: SYSTEM_ACTOR.to_string(),
            created_at: now,
            is_revert: true,
            reverted_from_version: Some(target.version_number.clone()),
        };

        // Snapshot fields the target left unset stay unset in the patch:
        // they meant "unchanged" when the target was created, so they leave
        // the live state untouched now too.
        let patch = StatePatch {
            name: target.title.clone(),
            description: target.description.clone(),
            price: target.price,
            image: target.image.clone(),
            updated_at: now,
        };

        store
            .append_version_and_patch_state(&product, &version, &patch)
            .await?;

        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mem_store::MemoryStore;
    use crate::models::product::CreateProduct;

    async fn seeded_store(price: Double, image: Option<&str>) -> (MemoryStore, Uuid) {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        Product::create(
            &store,
            CreateProduct {
                id,
                name: "Lamp".to_string(),
                description: "A desk lamp".to_string(),
                price,
                image: image.map(str::to_string),
                created_by: "tester".to_string(),
            },
        )
        .await
        .unwrap();

        (store, id)
    }

    fn edit_with_price(price: Double) -> EditProduct {
        EditProduct {
            title: "Lamp".to_string(),
            description: "A desk lamp".to_string(),
            price,
            image: None,
            created_by: "tester".to_string(),
            changes: "Price update".to_string(),
        }
    }

    #[tokio::test]
    async fn create_seeds_exactly_one_initial_version() {
        let (store, id) = seeded_store(20.0, None).await;
        let product = store.product(id).unwrap();

        assert_eq!(product.versions.len(), 1);

        let initial = &product.versions[0];
        assert_eq!(initial.version_number, "1.0");
        assert_eq!(initial.changes, "Initial version");
        assert_eq!(initial.title.as_deref(), Some("Lamp"));
        assert_eq!(initial.price, Some(20.0));
        assert!(!initial.is_revert);
    }

    #[tokio::test]
    async fn edit_appends_version_and_patches_state() {
        let (store, id) = seeded_store(20.0, None).await;

        let label = Product::edit(&store, id, edit_with_price(25.0)).await.unwrap();

        assert_eq!(label.to_string(), "1.1");

        let product = store.product(id).unwrap();
        assert_eq!(product.versions.len(), 2);
        assert_eq!(product.price, 25.0);
        assert_eq!(product.versions.last().unwrap().price, Some(25.0));
        assert!(product.updated_at > product.created_at);
    }

    #[tokio::test]
    async fn edit_without_image_keeps_current_image() {
        let (store, id) = seeded_store(20.0, Some("https://bucket/lamp.jpg")).await;

        Product::edit(&store, id, edit_with_price(25.0)).await.unwrap();

        let product = store.product(id).unwrap();
        assert_eq!(product.image.as_deref(), Some("https://bucket/lamp.jpg"));
        assert_eq!(product.versions.last().unwrap().image, None);
    }

    #[tokio::test]
    async fn edit_with_image_overwrites_current_image() {
        let (store, id) = seeded_store(20.0, Some("https://bucket/lamp.jpg")).await;

        let mut edit = edit_with_price(25.0);
        edit.image = Some("https://bucket/lamp-v2.jpg".to_string());
        Product::edit(&store, id, edit).await.unwrap();

        let product = store.product(id).unwrap();
        assert_eq!(product.image.as_deref(), Some("https://bucket/lamp-v2.jpg"));
    }

    #[tokio::test]
    async fn edit_of_unknown_product_is_not_found() {
        let store = MemoryStore::new();

        let result = Product::edit(&store, Uuid::new_v4(), edit_with_price(25.0)).await;

        assert!(matches!(result, Err(ProdsnapError::NotFound(_))));
    }

    #[tokio::test]
    async fn revert_copies_target_snapshot_and_appends_forward() {
        let (store, id) = seeded_store(20.0, None).await;

        Product::edit(&store, id, edit_with_price(25.0)).await.unwrap();

        let target = store.product(id).unwrap().versions[0].clone();
        let label = Product::revert(&store, id, target.id).await.unwrap();

        assert_eq!(label.to_string(), "1.2");

        let product = store.product(id).unwrap();
        assert_eq!(product.versions.len(), 3);
        assert_eq!(product.price, 20.0);

        let revert = product.versions.last().unwrap();
        assert!(revert.is_revert);
        assert_eq!(revert.reverted_from_version.as_deref(), Some("1.0"));
        assert_eq!(revert.created_by, SYSTEM_ACTOR);
        assert_eq!(revert.changes, "Reverted to 1.0");
        assert_eq!(revert.title, target.title);
        assert_eq!(revert.description, target.description);
        assert_eq!(revert.price, target.price);
        assert_eq!(revert.image, target.image);

        // the new label is strictly greater than every prior one
        let new_label: VersionLabel = revert.version_number.parse().unwrap();
        for prior in &product.versions[..product.versions.len() - 1] {
            assert!(prior.version_number.parse::<VersionLabel>().unwrap() < new_label);
        }
    }

    #[tokio::test]
    async fn revert_of_unknown_version_is_not_found() {
        let (store, id) = seeded_store(20.0, None).await;

        let result = Product::revert(&store, id, Uuid::new_v4()).await;

        assert!(matches!(result, Err(ProdsnapError::NotFound(_))));

        // failed precondition leaves the product untouched
        assert_eq!(store.product(id).unwrap().versions.len(), 1);
    }

    #[tokio::test]
    async fn failed_commit_leaves_product_unchanged() {
        let (store, id) = seeded_store(20.0, None).await;
        let before = store.product(id).unwrap();

        store.fail_next_commit();
        let result = Product::edit(&store, id, edit_with_price(99.0)).await;

        assert!(matches!(result, Err(ProdsnapError::CommitFailed(_))));

        let after = store.product(id).unwrap();
        assert_eq!(after.versions.len(), before.versions.len());
        assert_eq!(after.name, before.name);
        assert_eq!(after.price, before.price);
        assert_eq!(after.image, before.image);
        assert_eq!(after.updated_at, before.updated_at);
    }

    #[tokio::test]
    async fn stale_aggregate_is_rejected_as_conflict() {
        let (store, id) = seeded_store(20.0, None).await;
        let stale = store.product(id).unwrap();

        // another writer wins the append slot first
        Product::edit(&store, id, edit_with_price(30.0)).await.unwrap();

        let version = ProductVersion {
            id: Uuid::new_v4(),
            version_number: "9.9".to_string(),
            ..Default::default()
        };
        let patch = StatePatch {
            name: None,
            description: None,
            price: None,
            image: None,
            updated_at: chrono::Utc::now(),
        };
        let result = store
            .append_version_and_patch_state(&stale, &version, &patch)
            .await;

        assert!(matches!(result, Err(ProdsnapError::Conflict(_))));
        assert_eq!(store.product(id).unwrap().versions.len(), 2);
    }

    #[tokio::test]
    async fn stale_write_is_rejected_even_when_timestamps_collide() {
        let (store, id) = seeded_store(20.0, None).await;
        let loaded = store.product(id).unwrap();

        // the winning commit reuses the exact timestamp it was read at, so
        // updated_at alone cannot tell the loser that it lost
        let version = ProductVersion {
            id: Uuid::new_v4(),
            version_number: "1.1".to_string(),
            ..Default::default()
        };
        let patch = StatePatch {
            name: None,
            description: None,
            price: None,
            image: None,
            updated_at: loaded.updated_at,
        };
        store
            .append_version_and_patch_state(&loaded, &version, &patch)
            .await
            .unwrap();

        let duplicate = ProductVersion {
            id: Uuid::new_v4(),
            version_number: "1.1".to_string(),
            ..Default::default()
        };
        let result = store
            .append_version_and_patch_state(&loaded, &duplicate, &patch)
            .await;

        assert!(matches!(result, Err(ProdsnapError::Conflict(_))));
        assert_eq!(store.product(id).unwrap().versions.len(), 2);
    }

    #[tokio::test]
    async fn version_sequence_grows_by_exactly_one_per_mutation() {
        let (store, id) = seeded_store(20.0, None).await;

        for expected_len in 2..6 {
            Product::edit(&store, id, edit_with_price(21.0)).await.unwrap();
            assert_eq!(store.product(id).unwrap().versions.len(), expected_len);
        }

        let first = store.product(id).unwrap().versions[0].clone();
        Product::revert(&store, id, first.id).await.unwrap();
        assert_eq!(store.product(id).unwrap().versions.len(), 6);
    }

    #[tokio::test]
    async fn lamp_scenario_runs_end_to_end() {
        let (store, id) = seeded_store(20.0, None).await;

        assert_eq!(store.product(id).unwrap().versions[0].version_number, "1.0");

        let label = Product::edit(&store, id, edit_with_price(25.0)).await.unwrap();
        assert_eq!(label.to_string(), "1.1");
        assert_eq!(store.product(id).unwrap().price, 25.0);
        assert_eq!(store.product(id).unwrap().image, None);

        for _ in 0..8 {
            Product::edit(&store, id, edit_with_price(25.0)).await.unwrap();
        }
        assert_eq!(
            store.product(id).unwrap().versions.last().unwrap().version_number,
            "1.9"
        );

        let label = Product::edit(&store, id, edit_with_price(25.0)).await.unwrap();
        assert_eq!(label.to_string(), "2.0");

        let initial = store.product(id).unwrap().versions[0].clone();
        let label = Product::revert(&store, id, initial.id).await.unwrap();
        assert_eq!(label.to_string(), "2.1");

        let product = store.product(id).unwrap();
        let revert = product.versions.last().unwrap();
        assert!(revert.is_revert);
        assert_eq!(revert.reverted_from_version.as_deref(), Some("1.0"));
        assert_eq!(product.price, 20.0);
    }
}
