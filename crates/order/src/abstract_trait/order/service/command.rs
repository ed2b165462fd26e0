use crate::domain::{
    actor::Actor,
    requests::{
        order::CreateOrderRequest, payment::CreatePaymentIntentRequest,
    },
    response::{
        api::ApiResponse,
        order::{CancelOrderResponse, OrderResponse},
        payment::PaymentIntentResponse,
    },
    status::OrderStatus,
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandServiceTrait {
    async fn create_order(
        &self,
        actor: &Actor,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn cancel_order(
        &self,
        actor: &Actor,
        order_id: Uuid,
    ) -> Result<ApiResponse<CancelOrderResponse>, ServiceError>;
    async fn assign_order(
        &self,
        actor: &Actor,
        order_id: Uuid,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn advance_status(
        &self,
        actor: &Actor,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn create_payment_intent(
        &self,
        actor: &Actor,
        req: &CreatePaymentIntentRequest,
    ) -> Result<ApiResponse<PaymentIntentResponse>, ServiceError>;
}
