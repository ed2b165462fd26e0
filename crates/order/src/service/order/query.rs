use crate::{
    abstract_trait::order::{repository::DynOrderQueryRepository, service::OrderQueryServiceTrait},
    domain::{
        actor::{Actor, Role},
        response::{api::ApiResponse, order::OrderResponse},
        status::OrderStatus,
    },
    model::order::Order,
    service::instrument::ServiceInstrument,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{errors::ServiceError, utils::Method};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    instrument: ServiceInstrument,
}

impl OrderQueryService {
    pub async fn new(query: DynOrderQueryRepository, registry: Arc<Mutex<Registry>>) -> Self {
        let instrument = ServiceInstrument::new(
            "order-query-service",
            "order_query_service",
            "OrderQueryService",
            &registry,
        )
        .await;

        Self { query, instrument }
    }

    fn can_read(actor: &Actor, order: &Order) -> bool {
        match actor.role {
            Role::Admin => true,
            Role::Buyer => order.buyer_id == actor.id,
            Role::Worker => order.assigned_to == Some(actor.id),
        }
    }

    async fn load_visible(&self, actor: &Actor, id: Uuid) -> Result<Order, ServiceError> {
        let order = self
            .query
            .find_order(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {id}")))?;

        if !Self::can_read(actor, &order) {
            return Err(ServiceError::Forbidden(format!(
                "order {id} is not visible to this user"
            )));
        }

        Ok(order)
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_by_id(
        &self,
        actor: &Actor,
        id: Uuid,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🔍 Finding order {id}");

        let method = Method::Get;
        let tracing_ctx = self.instrument.start_tracing(
            "find_order_by_id",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order_id", id.to_string()),
            ],
        );

        let result = self.load_visible(actor, id).await;
        let order = self
            .instrument
            .finish(&tracing_ctx, method, "Order retrieved", result)?;

        Ok(ApiResponse::success(
            "Order retrieved successfully",
            OrderResponse::from(order),
        ))
    }

    async fn find_mine(
        &self,
        actor: &Actor,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        info!("🔍 Listing orders of buyer {}", actor.id);

        let method = Method::Get;
        let tracing_ctx = self.instrument.start_tracing(
            "find_my_orders",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("buyer_id", actor.id.to_string()),
            ],
        );

        let result = match actor.require(Role::Buyer) {
            Ok(()) => self
                .query
                .list_orders_by_buyer(actor.id)
                .await
                .map_err(ServiceError::from),
            Err(e) => Err(e),
        };
        let orders = self
            .instrument
            .finish(&tracing_ctx, method, "Orders retrieved", result)?;

        Ok(ApiResponse::success(
            "Orders retrieved successfully",
            orders.into_iter().map(OrderResponse::from).collect(),
        ))
    }

    async fn find_active_assignment(
        &self,
        actor: &Actor,
    ) -> Result<ApiResponse<Option<OrderResponse>>, ServiceError> {
        info!("🔍 Finding active assignment of worker {}", actor.id);

        let method = Method::Get;
        let tracing_ctx = self.instrument.start_tracing(
            "find_active_assignment",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("worker_id", actor.id.to_string()),
            ],
        );

        let result = match actor.require(Role::Worker) {
            Ok(()) => self
                .query
                .list_orders_by_worker(actor.id, &OrderStatus::TERMINAL)
                .await
                .map_err(ServiceError::from),
            Err(e) => Err(e),
        };
        let active = self
            .instrument
            .finish(&tracing_ctx, method, "Active assignment retrieved", result)?;

        Ok(ApiResponse::success(
            "Active assignment retrieved successfully",
            active.into_iter().next().map(OrderResponse::from),
        ))
    }
}
