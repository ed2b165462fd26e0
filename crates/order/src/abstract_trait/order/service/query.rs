use crate::domain::{
    actor::Actor,
    response::{api::ApiResponse, order::OrderResponse},
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderQueryService = Arc<dyn OrderQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryServiceTrait {
    async fn find_by_id(
        &self,
        actor: &Actor,
        id: Uuid,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn find_mine(&self, actor: &Actor)
    -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError>;
    async fn find_active_assignment(
        &self,
        actor: &Actor,
    ) -> Result<ApiResponse<Option<OrderResponse>>, ServiceError>;
}
