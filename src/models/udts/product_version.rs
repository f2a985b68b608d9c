use charybdis::macros::charybdis_udt_model;
use charybdis::types::{Boolean, Double, Text, Timestamp, Uuid};
use serde::{Deserialize, Serialize};

/// An immutable snapshot-plus-metadata record, owned by its product and
/// never mutated or deleted after it is appended.
///
/// Snapshot fields are optional: an unset field means "unchanged from the
/// product's current state at the moment this version was created". A
/// submitted empty string is stored as an explicit value, so "cleared" and
/// "not submitted" stay distinguishable.
#[derive(Serialize, Deserialize, Clone, Default, Debug, PartialEq)]
#[charybdis_udt_model(type_name = product_version)]
pub struct ProductVersion {
    pub id: Uuid,

    #[serde(rename = "versionNumber")]
    pub version_number: Text,

    pub title: Option<Text>,
    pub description: Option<Text>,
    pub price: Option<Double>,
    pub image: Option<Text>,

    pub changes: Text,

    #[serde(rename = "createdBy")]
    pub created_by: Text,

    #[serde(rename = "createdAt", default = "chrono::Utc::now")]
    pub created_at: Timestamp,

    #[serde(rename = "isRevert", default)]
    pub is_revert: Boolean,

    #[serde(rename = "revertedFromVersion")]
    pub reverted_from_version: Option<Text>,
}
