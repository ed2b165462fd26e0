use crate::{
    abstract_trait::product::ProductCommandRepositoryTrait,
    domain::stock::{StockDelta, StockLevel, StockUpdateOutcome},
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info, warn};

pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn conditional_update_product_stock(
        &self,
        deltas: &[StockDelta],
    ) -> Result<StockUpdateOutcome, RepositoryError> {
        // lock rows in a stable order so concurrent batches cannot deadlock
        let mut ordered = deltas.to_vec();
        ordered.sort_by_key(|d| d.product_id);

        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;
        let mut levels = Vec::with_capacity(ordered.len());

        for delta in &ordered {
            let updated = sqlx::query_scalar::<_, i32>(
                r#"
                UPDATE products
                SET quantity   = quantity + $2,
                    sold       = GREATEST(sold - $2, 0),
                    updated_at = current_timestamp
                WHERE product_id = $1 AND quantity >= $3
                RETURNING quantity
                "#,
            )
            .bind(delta.product_id)
            .bind(delta.delta)
            .bind(delta.qty_guard)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to update stock for product {}: {:?}",
                    delta.product_id, err
                );
                RepositoryError::from(err)
            })?;

            match updated {
                Some(quantity_after) => levels.push(StockLevel {
                    product_id: delta.product_id,
                    quantity_before: quantity_after - delta.delta,
                    quantity_after,
                }),
                None => {
                    let available = sqlx::query_scalar::<_, i32>(
                        "SELECT quantity FROM products WHERE product_id = $1",
                    )
                    .bind(delta.product_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(RepositoryError::from)?;

                    tx.rollback().await.map_err(RepositoryError::from)?;

                    return Ok(match available {
                        None => {
                            warn!("⚠️ Stock update aborted, product {} missing", delta.product_id);
                            StockUpdateOutcome::Missing(delta.product_id)
                        }
                        Some(available) => {
                            warn!(
                                "⚠️ Stock update aborted, product {} has {} left (guard {})",
                                delta.product_id, available, delta.qty_guard
                            );
                            StockUpdateOutcome::Insufficient {
                                product_id: delta.product_id,
                                available,
                            }
                        }
                    });
                }
            }
        }

        tx.commit().await.map_err(|err| {
            error!("❌ Failed to commit stock update: {:?}", err);
            RepositoryError::from(err)
        })?;

        info!("✅ Applied {} stock deltas", levels.len());
        Ok(StockUpdateOutcome::Applied(levels))
    }
}
