use crate::domain::stock::{StockDelta, StockUpdateOutcome};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductCommandRepositoryTrait {
    /// Applies every delta or none of them. Each delta is a guarded write:
    /// it only lands while the product's quantity is at least `qty_guard`.
    async fn conditional_update_product_stock(
        &self,
        deltas: &[StockDelta],
    ) -> Result<StockUpdateOutcome, RepositoryError>;
}
