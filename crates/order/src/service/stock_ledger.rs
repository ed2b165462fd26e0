use crate::{
    abstract_trait::product::DynProductCommandRepository,
    domain::stock::{Reservation, StockDelta, StockLine, StockUpdateOutcome},
};
use shared::errors::ServiceError;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct StockLedger {
    command: DynProductCommandRepository,
}

impl StockLedger {
    pub fn new(command: DynProductCommandRepository) -> Self {
        Self { command }
    }

    pub fn merge_lines(lines: &[StockLine]) -> Vec<StockLine> {
        let mut merged: Vec<StockLine> = Vec::with_capacity(lines.len());
        for line in lines {
            match merged.iter_mut().find(|m| m.product_id == line.product_id) {
                Some(existing) => existing.qty += line.qty,
                None => merged.push(*line),
            }
        }
        merged
    }

    pub async fn reserve(&self, lines: &[StockLine]) -> Result<Vec<Reservation>, ServiceError> {
        let merged = Self::merge_lines(lines);

        if let Some(line) = merged.iter().find(|l| l.qty <= 0) {
            return Err(ServiceError::Validation(vec![format!(
                "qty for product {} must be positive",
                line.product_id
            )]));
        }

        let deltas: Vec<StockDelta> = merged
            .iter()
            .map(|line| StockDelta {
                product_id: line.product_id,
                delta: -line.qty,
                qty_guard: line.qty,
            })
            .collect();

        match self.command.conditional_update_product_stock(&deltas).await? {
            StockUpdateOutcome::Applied(levels) => {
                let reservations = merged
                    .iter()
                    .map(|line| {
                        levels
                            .iter()
                            .find(|level| level.product_id == line.product_id)
                            .map(|level| Reservation {
                                product_id: line.product_id,
                                qty: line.qty,
                                stock_before: level.quantity_before,
                            })
                            .ok_or_else(|| {
                                ServiceError::Internal(format!(
                                    "stock level missing for product {}",
                                    line.product_id
                                ))
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                info!("📦 Reserved stock for {} products", reservations.len());
                Ok(reservations)
            }
            StockUpdateOutcome::Missing(product_id) => {
                warn!("⚠️ Reservation rejected, product {product_id} not found");
                Err(ServiceError::ProductNotFound(product_id))
            }
            StockUpdateOutcome::Insufficient {
                product_id,
                available,
            } => {
                let requested = merged
                    .iter()
                    .find(|l| l.product_id == product_id)
                    .map(|l| l.qty)
                    .unwrap_or_default();
                warn!(
                    "⚠️ Reservation rejected, product {product_id}: requested={requested}, available={available}"
                );
                Err(ServiceError::OutOfStock {
                    product_id,
                    requested,
                    available,
                })
            }
        }
    }

    // products gone from the catalog are skipped
    pub async fn release(&self, lines: &[StockLine]) -> Result<(), ServiceError> {
        let mut pending = Self::merge_lines(lines);

        loop {
            if pending.is_empty() {
                return Ok(());
            }

            let deltas: Vec<StockDelta> = pending
                .iter()
                .map(|line| StockDelta {
                    product_id: line.product_id,
                    delta: line.qty,
                    qty_guard: 0,
                })
                .collect();

            match self.command.conditional_update_product_stock(&deltas).await? {
                StockUpdateOutcome::Applied(levels) => {
                    info!("📦 Released stock for {} products", levels.len());
                    return Ok(());
                }
                StockUpdateOutcome::Missing(product_id) => {
                    warn!("⚠️ Skipping release for missing product {product_id}");
                    pending.retain(|line| line.product_id != product_id);
                }
                StockUpdateOutcome::Insufficient { product_id, .. } => {
                    error!("❌ Release guard rejected product {product_id}");
                    return Err(ServiceError::Internal(format!(
                        "release rejected for product {product_id}"
                    )));
                }
            }
        }
    }

    pub async fn compensate(&self, reservations: &[Reservation]) {
        let lines: Vec<StockLine> = reservations
            .iter()
            .map(|r| StockLine {
                product_id: r.product_id,
                qty: r.qty,
            })
            .collect();

        if let Err(e) = self.release(&lines).await {
            let ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
            error!("❌ Failed to compensate reservation for {ids:?}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::product::Product, repository::InMemoryStore};
    use chrono::Utc;
    use std::sync::Arc;

    fn product(quantity: i32) -> Product {
        Product {
            product_id: Uuid::new_v4(),
            name: "Widget".into(),
            description: "A widget".into(),
            weight: None,
            price: 50,
            quantity,
            sold: 0,
            category_id: None,
            category_name: None,
            seller_id: None,
            seller_name: None,
            image_id: None,
            image_url: None,
            status: "approved".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn ledger(store: &InMemoryStore) -> StockLedger {
        StockLedger::new(Arc::new(store.clone()))
    }

    #[test]
    fn test_merge_lines_sums_duplicates_in_first_seen_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let merged = StockLedger::merge_lines(&[
            StockLine { product_id: a, qty: 1 },
            StockLine { product_id: b, qty: 2 },
            StockLine { product_id: a, qty: 3 },
        ]);

        assert_eq!(
            merged,
            vec![
                StockLine { product_id: a, qty: 4 },
                StockLine { product_id: b, qty: 2 },
            ]
        );
    }

    #[tokio::test]
    async fn test_reserve_reports_stock_before_purchase() {
        let store = InMemoryStore::new();
        let p = product(5);
        store.upsert_product(p.clone()).unwrap();

        let reservations = ledger(&store)
            .reserve(&[StockLine { product_id: p.product_id, qty: 3 }])
            .await
            .unwrap();

        assert_eq!(reservations[0].stock_before, 5);
        let after = store.product(p.product_id).unwrap().unwrap();
        assert_eq!((after.quantity, after.sold), (2, 3));
    }

    #[tokio::test]
    async fn test_reserve_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let plenty = product(10);
        let scarce = product(1);
        store.upsert_product(plenty.clone()).unwrap();
        store.upsert_product(scarce.clone()).unwrap();

        let err = ledger(&store)
            .reserve(&[
                StockLine { product_id: plenty.product_id, qty: 4 },
                StockLine { product_id: scarce.product_id, qty: 2 },
            ])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::OutOfStock { product_id, requested: 2, available: 1 }
                if product_id == scarce.product_id
        ));
        assert_eq!(store.product(plenty.product_id).unwrap().unwrap().quantity, 10);
    }

    #[tokio::test]
    async fn test_reserve_unknown_product() {
        let store = InMemoryStore::new();
        let missing = Uuid::new_v4();

        let err = ledger(&store)
            .reserve(&[StockLine { product_id: missing, qty: 1 }])
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::ProductNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn test_duplicate_lines_are_guarded_as_one() {
        let store = InMemoryStore::new();
        let p = product(3);
        store.upsert_product(p.clone()).unwrap();

        let err = ledger(&store)
            .reserve(&[
                StockLine { product_id: p.product_id, qty: 2 },
                StockLine { product_id: p.product_id, qty: 2 },
            ])
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::OutOfStock { requested: 4, available: 3, .. }));
    }

    #[tokio::test]
    async fn test_release_round_trip_restores_counters() {
        let store = InMemoryStore::new();
        let p = product(8);
        store.upsert_product(p.clone()).unwrap();
        let ledger = ledger(&store);
        let lines = [StockLine { product_id: p.product_id, qty: 5 }];

        ledger.reserve(&lines).await.unwrap();
        ledger.release(&lines).await.unwrap();

        let after = store.product(p.product_id).unwrap().unwrap();
        assert_eq!((after.quantity, after.sold), (8, 0));
    }

    #[tokio::test]
    async fn test_release_floors_sold_and_skips_missing_products() {
        let store = InMemoryStore::new();
        let p = product(0);
        store.upsert_product(p.clone()).unwrap();

        ledger(&store)
            .release(&[
                StockLine { product_id: Uuid::new_v4(), qty: 1 },
                StockLine { product_id: p.product_id, qty: 2 },
            ])
            .await
            .unwrap();

        let after = store.product(p.product_id).unwrap().unwrap();
        assert_eq!((after.quantity, after.sold), (2, 0));
    }
}
