use super::ORDER_COLUMNS;
use crate::{
    abstract_trait::order::repository::OrderQueryRepositoryTrait,
    domain::status::OrderStatus,
    model::{
        order::{Order, OrderRow},
        payment::PaymentIntentRecord,
    },
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_order(&self, id: Uuid) -> Result<Option<Order>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch order {}: {:?}", id, e);
            RepositoryError::from(e)
        })?;

        row.map(Order::try_from).transpose()
    }

    async fn list_orders_by_worker(
        &self,
        worker_id: Uuid,
        exclude_statuses: &[OrderStatus],
    ) -> Result<Vec<Order>, RepositoryError> {
        info!("🔍 Fetching orders assigned to worker {worker_id}");

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let excluded: Vec<String> = exclude_statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE assigned_to = $1 AND NOT (status = ANY($2))
            ORDER BY created_at DESC
            "#
        ))
        .bind(worker_id)
        .bind(&excluded)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch orders for worker {}: {:?}", worker_id, e);
            RepositoryError::from(e)
        })?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn list_orders_by_buyer(&self, buyer_id: Uuid) -> Result<Vec<Order>, RepositoryError> {
        info!("🔍 Fetching orders placed by buyer {buyer_id}");

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE buyer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(buyer_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch orders for buyer {}: {:?}", buyer_id, e);
            RepositoryError::from(e)
        })?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn find_intent(
        &self,
        intent_id: &str,
    ) -> Result<Option<PaymentIntentRecord>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, PaymentIntentRecord>(
            r#"
            SELECT intent_id, buyer_id, amount, currency, created_at
            FROM payment_intents
            WHERE intent_id = $1
            "#,
        )
        .bind(intent_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch payment intent {}: {:?}", intent_id, e);
            RepositoryError::from(e)
        })
    }
}
