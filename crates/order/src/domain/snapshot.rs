//! Frozen copies of catalog data embedded into order lines.
//!
//! Lines written before snapshotting existed only carry a handful of flat
//! fields. Both shapes are stored under a `snapshotVersion` tag and read
//! through [`LineSnapshot::view`], so callers never branch on the version.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const LEGACY_SNAPSHOT_VERSION: &str = "1.0";
pub const CURRENT_SNAPSHOT_VERSION: &str = "2.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageRef {
    pub id: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub original_price: i64,
    pub stock_before_purchase: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub name: String,
    pub description: String,
    pub weight: Option<f64>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub seller_id: Option<Uuid>,
    pub seller_name: Option<String>,
    pub image: ImageRef,
    pub approval_status: String,
    pub metadata: SnapshotMetadata,
}

/// Flat fields carried by lines created before snapshots were introduced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegacyLineSnapshot {
    pub name: String,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "snapshotVersion")]
pub enum LineSnapshot {
    #[serde(rename = "1.0")]
    V1(LegacyLineSnapshot),
    #[serde(rename = "2.0")]
    V2(ProductSnapshot),
}

/// Version-independent projection of a line snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotView {
    pub snapshot_version: String,
    pub name: String,
    pub description: Option<String>,
    pub weight: Option<f64>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub seller_id: Option<Uuid>,
    pub seller_name: Option<String>,
    pub image_url: Option<String>,
    pub approval_status: Option<String>,
    pub original_price: Option<i64>,
    pub stock_before_purchase: Option<i32>,
}

impl LineSnapshot {
    pub fn version(&self) -> &'static str {
        match self {
            LineSnapshot::V1(_) => LEGACY_SNAPSHOT_VERSION,
            LineSnapshot::V2(_) => CURRENT_SNAPSHOT_VERSION,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            LineSnapshot::V1(legacy) => &legacy.name,
            LineSnapshot::V2(snapshot) => &snapshot.name,
        }
    }

    pub fn view(&self) -> SnapshotView {
        match self {
            LineSnapshot::V1(legacy) => SnapshotView {
                snapshot_version: LEGACY_SNAPSHOT_VERSION.to_string(),
                name: legacy.name.clone(),
                description: None,
                weight: None,
                category_id: None,
                category_name: None,
                seller_id: None,
                seller_name: None,
                image_url: legacy.image.clone(),
                approval_status: None,
                original_price: legacy.price,
                stock_before_purchase: None,
            },
            LineSnapshot::V2(snapshot) => SnapshotView {
                snapshot_version: CURRENT_SNAPSHOT_VERSION.to_string(),
                name: snapshot.name.clone(),
                description: Some(snapshot.description.clone()),
                weight: snapshot.weight,
                category_id: snapshot.category_id,
                category_name: snapshot.category_name.clone(),
                seller_id: snapshot.seller_id,
                seller_name: snapshot.seller_name.clone(),
                image_url: snapshot.image.url.clone(),
                approval_status: Some(snapshot.approval_status.clone()),
                original_price: Some(snapshot.metadata.original_price),
                stock_before_purchase: Some(snapshot.metadata.stock_before_purchase),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_line_reads_through_adapter() {
        let raw = json!({
            "snapshotVersion": "1.0",
            "name": "Old Lamp",
            "price": 40,
            "image": "https://cdn.example/lamp.png"
        });

        let snapshot: LineSnapshot = serde_json::from_value(raw).unwrap();
        let view = snapshot.view();

        assert_eq!(snapshot.version(), LEGACY_SNAPSHOT_VERSION);
        assert_eq!(view.name, "Old Lamp");
        assert_eq!(view.original_price, Some(40));
        assert_eq!(view.image_url.as_deref(), Some("https://cdn.example/lamp.png"));
        assert_eq!(view.seller_name, None);
        assert_eq!(view.stock_before_purchase, None);
    }

    #[test]
    fn test_legacy_line_tolerates_missing_optional_fields() {
        let raw = json!({ "snapshotVersion": "1.0", "name": "Bare" });

        let view = serde_json::from_value::<LineSnapshot>(raw).unwrap().view();

        assert_eq!(view.name, "Bare");
        assert_eq!(view.original_price, None);
        assert_eq!(view.image_url, None);
    }

    #[test]
    fn test_current_snapshot_is_tagged_on_the_wire() {
        let snapshot = LineSnapshot::V2(ProductSnapshot {
            name: "Desk".into(),
            description: "Oak desk".into(),
            weight: Some(12.5),
            category_id: None,
            category_name: Some("Furniture".into()),
            seller_id: None,
            seller_name: Some("Acme".into()),
            image: ImageRef {
                id: Some("img-1".into()),
                url: Some("https://cdn.example/desk.png".into()),
            },
            approval_status: "approved".into(),
            metadata: SnapshotMetadata {
                original_price: 250,
                stock_before_purchase: 7,
            },
        });

        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["snapshotVersion"], "2.0");
        assert_eq!(value["metadata"]["stockBeforePurchase"], 7);
        assert_eq!(serde_json::from_value::<LineSnapshot>(value).unwrap(), snapshot);
    }
}
