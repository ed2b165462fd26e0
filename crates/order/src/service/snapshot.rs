use crate::{
    domain::snapshot::{ImageRef, LineSnapshot, ProductSnapshot, SnapshotMetadata},
    model::product::Product,
};

pub struct SnapshotBuilder;

impl SnapshotBuilder {
    pub fn freeze(product: &Product, stock_before_purchase: i32) -> LineSnapshot {
        LineSnapshot::V2(ProductSnapshot {
            name: product.name.clone(),
            description: product.description.clone(),
            weight: product.weight,
            category_id: product.category_id,
            category_name: product.category_name.clone(),
            seller_id: product.seller_id,
            seller_name: product.seller_name.clone(),
            image: ImageRef {
                id: product.image_id.clone(),
                url: product.image_url.clone(),
            },
            approval_status: product.status.clone(),
            metadata: SnapshotMetadata {
                original_price: product.price,
                stock_before_purchase,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::CURRENT_SNAPSHOT_VERSION;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_freeze_copies_catalog_fields() {
        let mut product = Product {
            product_id: Uuid::new_v4(),
            name: "Kettle".into(),
            description: "1.7L steel kettle".into(),
            weight: Some(1.2),
            price: 100,
            quantity: 9,
            sold: 1,
            category_id: Some(Uuid::new_v4()),
            category_name: Some("Kitchen".into()),
            seller_id: Some(Uuid::new_v4()),
            seller_name: Some("Acme".into()),
            image_id: Some("img-9".into()),
            image_url: Some("https://cdn.example/kettle.png".into()),
            status: "approved".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let snapshot = SnapshotBuilder::freeze(&product, 10);
        product.name = "Renamed".into();
        product.price = 999;

        let view = snapshot.view();
        assert_eq!(snapshot.version(), CURRENT_SNAPSHOT_VERSION);
        assert_eq!(view.name, "Kettle");
        assert_eq!(view.category_name.as_deref(), Some("Kitchen"));
        assert_eq!(view.seller_name.as_deref(), Some("Acme"));
        assert_eq!(view.approval_status.as_deref(), Some("approved"));
        assert_eq!(view.original_price, Some(100));
        assert_eq!(view.stock_before_purchase, Some(10));
    }
}
