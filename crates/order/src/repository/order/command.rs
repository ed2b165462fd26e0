use super::ORDER_COLUMNS;
use crate::{
    abstract_trait::order::repository::{AssignOutcome, OrderCommandRepositoryTrait},
    domain::{status::OrderStatus, stock::StockLine},
    model::{
        order::{Order, OrderPatch, OrderRow, StatusHistoryEntry},
        payment::PaymentIntentRecord,
    },
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::{PgConnection, types::Json};
use tracing::{error, info, warn};
use uuid::Uuid;

const ONE_ACTIVE_PER_WORKER: &str = "orders_one_active_per_worker";
const PAYMENT_ID_UNIQUE: &str = "orders_payment_id_unique";

pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn create_order(&self, order: &Order) -> Result<Order, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO orders (
                order_id, buyer_id, lines, address, payment_method, shipping_fee, total,
                status, assigned_to, status_history, status_updated_at, payment_details,
                refund_details, cancelled_at, snapshot_version, version, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.id)
        .bind(order.buyer_id)
        .bind(Json(&order.lines))
        .bind(Json(&order.address))
        .bind(order.payment_method.as_str())
        .bind(order.shipping_fee)
        .bind(order.total)
        .bind(order.status.as_str())
        .bind(order.assigned_to)
        .bind(Json(&order.status_history))
        .bind(order.current_status.updated_at)
        .bind(order.payment_details.as_ref().map(Json))
        .bind(order.refund_details.as_ref().map(Json))
        .bind(order.cancelled_at)
        .bind(&order.snapshot_version)
        .bind(order.version)
        .bind(order.created_at)
        .bind(order.updated_at)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(PAYMENT_ID_UNIQUE) =>
            {
                warn!("⚠️ Payment already backs another order, rejecting order {}", order.id);
                RepositoryError::AlreadyExists(format!("payment for order {}", order.id))
            }
            err => {
                error!(
                    "❌ Failed to create order for buyer {}: {:?}",
                    order.buyer_id, err
                );
                RepositoryError::from(err)
            }
        })?;

        info!("✅ Created order ID {} for buyer {}", row.order_id, row.buyer_id);
        Order::try_from(row)
    }

    async fn record_intent(&self, intent: &PaymentIntentRecord) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query(
            r#"
            INSERT INTO payment_intents (intent_id, buyer_id, amount, currency, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&intent.intent_id)
        .bind(intent.buyer_id)
        .bind(intent.amount)
        .bind(&intent.currency)
        .bind(intent.created_at)
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to record payment intent {}: {:?}", intent.intent_id, err);
            RepositoryError::from(err)
        })?;

        info!("✅ Recorded payment intent {} for {}", intent.intent_id, intent.amount);
        Ok(())
    }

    async fn conditional_update_order(
        &self,
        id: Uuid,
        expected_version: i64,
        patch: &OrderPatch,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        match update_guarded(&mut *conn, id, expected_version, patch).await? {
            Some(row) => {
                info!("🔄 Updated order ID {} to version {}", row.order_id, row.version);
                Order::try_from(row).map(Some)
            }
            None => {
                warn!("⚠️ Version guard rejected update of order {id} (expected {expected_version})");
                Ok(None)
            }
        }
    }

    async fn cancel_and_release(
        &self,
        id: Uuid,
        expected_version: i64,
        patch: &OrderPatch,
        release: &[StockLine],
    ) -> Result<Option<Order>, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let Some(row) = update_guarded(&mut *tx, id, expected_version, patch).await? else {
            tx.rollback().await.map_err(RepositoryError::from)?;
            warn!("⚠️ Version guard rejected cancel of order {id} (expected {expected_version})");
            return Ok(None);
        };

        let mut ordered = release.to_vec();
        ordered.sort_by_key(|line| line.product_id);

        for line in &ordered {
            let restored = sqlx::query(
                r#"
                UPDATE products
                SET quantity   = quantity + $2,
                    sold       = GREATEST(sold - $2, 0),
                    updated_at = current_timestamp
                WHERE product_id = $1
                "#,
            )
            .bind(line.product_id)
            .bind(line.qty)
            .execute(&mut *tx)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to restore stock for product {}: {:?}",
                    line.product_id, err
                );
                RepositoryError::from(err)
            })?;

            if restored.rows_affected() == 0 {
                warn!("⚠️ Product {} left the catalog, skipping its release", line.product_id);
            }
        }

        tx.commit().await.map_err(|err| {
            error!("❌ Failed to commit cancel of order {id}: {:?}", err);
            RepositoryError::from(err)
        })?;

        info!("🛑 Order {id} cancelled and {} lines restocked", ordered.len());
        Order::try_from(row).map(Some)
    }

    async fn assign_worker(
        &self,
        order_id: Uuid,
        worker_id: Uuid,
        entry: &StatusHistoryEntry,
    ) -> Result<AssignOutcome, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            UPDATE orders
            SET assigned_to       = $2,
                status            = 'Confirmed',
                status_history    = status_history || $3::jsonb,
                status_updated_at = $4,
                version           = version + 1,
                updated_at        = current_timestamp
            WHERE order_id = $1 AND assigned_to IS NULL AND status = 'OrderPlaced'
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order_id)
        .bind(worker_id)
        .bind(Json(vec![entry.clone()]))
        .bind(entry.changed_at)
        .fetch_optional(&mut *conn)
        .await;

        let row = match result {
            Ok(row) => row,
            Err(sqlx::Error::Database(db_err))
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(ONE_ACTIVE_PER_WORKER) =>
            {
                warn!("⚠️ Worker {worker_id} already holds an active order");
                return Ok(AssignOutcome::WorkerBusy);
            }
            Err(err) => {
                error!("❌ Failed to assign order {}: {:?}", order_id, err);
                return Err(RepositoryError::from(err));
            }
        };

        if let Some(row) = row {
            info!("✅ Order {order_id} assigned to worker {worker_id}");
            return Order::try_from(row).map(AssignOutcome::Assigned);
        }

        let current = sqlx::query_as::<_, (Option<Uuid>, String)>(
            "SELECT assigned_to, status FROM orders WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        Ok(match current {
            None => AssignOutcome::NotFound,
            Some((Some(_), _)) => AssignOutcome::AlreadyAssigned,
            Some((None, status)) => {
                AssignOutcome::NotAssignable(status.parse().map_err(RepositoryError::Custom)?)
            }
        })
    }
}

async fn update_guarded(
    conn: &mut PgConnection,
    id: Uuid,
    expected_version: i64,
    patch: &OrderPatch,
) -> Result<Option<OrderRow>, RepositoryError> {
    let history = patch.history.as_ref().map(|entry| Json(vec![entry.clone()]));
    let status_updated_at = patch.history.as_ref().map(|entry| entry.changed_at);

    sqlx::query_as::<_, OrderRow>(&format!(
        r#"
        UPDATE orders
        SET status            = COALESCE($3, status),
            assigned_to       = COALESCE($4, assigned_to),
            status_history    = CASE WHEN $5::jsonb IS NULL THEN status_history
                                     ELSE status_history || $5::jsonb END,
            status_updated_at = COALESCE($6, status_updated_at),
            refund_details    = COALESCE($7, refund_details),
            cancelled_at      = COALESCE($8, cancelled_at),
            version           = version + 1,
            updated_at        = current_timestamp
        WHERE order_id = $1 AND version = $2
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(expected_version)
    .bind(patch.status.map(OrderStatus::as_str))
    .bind(patch.assigned_to)
    .bind(history)
    .bind(status_updated_at)
    .bind(patch.refund_details.as_ref().map(Json))
    .bind(patch.cancelled_at)
    .fetch_optional(conn)
    .await
    .map_err(|err| {
        error!("❌ Failed to update order ID {}: {:?}", id, err);
        RepositoryError::from(err)
    })
}
