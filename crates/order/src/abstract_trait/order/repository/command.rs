use crate::{
    domain::{status::OrderStatus, stock::StockLine},
    model::{
        order::{Order, OrderPatch, StatusHistoryEntry},
        payment::PaymentIntentRecord,
    },
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum AssignOutcome {
    Assigned(Order),
    AlreadyAssigned,
    WorkerBusy,
    NotAssignable(OrderStatus),
    NotFound,
}

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Fails with `AlreadyExists` when another order already carries the
    /// same captured `payment_id`.
    async fn create_order(&self, order: &Order) -> Result<Order, RepositoryError>;

    async fn record_intent(&self, intent: &PaymentIntentRecord) -> Result<(), RepositoryError>;

    /// Returns `None` when the stored version no longer matches
    /// `expected_version` (or the order vanished).
    async fn conditional_update_order(
        &self,
        id: Uuid,
        expected_version: i64,
        patch: &OrderPatch,
    ) -> Result<Option<Order>, RepositoryError>;

    /// Binds `worker_id` and moves the order to `Confirmed` in one guarded
    /// write: only while the order is unassigned, still `OrderPlaced`, and
    /// the worker holds no other in-flight order.
    async fn assign_worker(
        &self,
        order_id: Uuid,
        worker_id: Uuid,
        entry: &StatusHistoryEntry,
    ) -> Result<AssignOutcome, RepositoryError>;

    /// Applies a cancelling patch and gives `release` back to stock as one
    /// unit. Returns `None` and changes nothing when the version guard fails.
    async fn cancel_and_release(
        &self,
        id: Uuid,
        expected_version: i64,
        patch: &OrderPatch,
        release: &[StockLine],
    ) -> Result<Option<Order>, RepositoryError>;
}
