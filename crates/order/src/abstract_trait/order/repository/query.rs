use crate::{
    domain::status::OrderStatus,
    model::{order::Order, payment::PaymentIntentRecord},
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderQueryRepository = Arc<dyn OrderQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryRepositoryTrait {
    async fn find_order(&self, id: Uuid) -> Result<Option<Order>, RepositoryError>;
    async fn list_orders_by_worker(
        &self,
        worker_id: Uuid,
        exclude_statuses: &[OrderStatus],
    ) -> Result<Vec<Order>, RepositoryError>;
    async fn list_orders_by_buyer(&self, buyer_id: Uuid) -> Result<Vec<Order>, RepositoryError>;
    async fn find_intent(
        &self,
        intent_id: &str,
    ) -> Result<Option<PaymentIntentRecord>, RepositoryError>;
}
