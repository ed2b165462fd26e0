use crate::{
    abstract_trait::order::repository::{
        AssignOutcome, DynOrderCommandRepository, DynOrderQueryRepository,
    },
    domain::{
        actor::{Actor, Role},
        status::OrderStatus,
    },
    model::order::{Order, StatusHistoryEntry},
    service::state_machine::OrderStateMachine,
};
use chrono::Utc;
use shared::errors::ServiceError;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AssignmentGuard {
    query: DynOrderQueryRepository,
    command: DynOrderCommandRepository,
}

impl AssignmentGuard {
    pub fn new(query: DynOrderQueryRepository, command: DynOrderCommandRepository) -> Self {
        Self { query, command }
    }

    pub async fn try_assign(&self, actor: &Actor, order_id: Uuid) -> Result<Order, ServiceError> {
        actor.require(Role::Worker)?;

        let order = self
            .query
            .find_order(order_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {order_id}")))?;

        if order.assigned_to.is_some() {
            return Err(ServiceError::AlreadyAssigned(order_id));
        }
        if order.status != OrderStatus::OrderPlaced {
            return Err(ServiceError::InvalidState(format!(
                "order {order_id} is {} and cannot be assigned",
                order.status
            )));
        }

        let active = self
            .query
            .list_orders_by_worker(actor.id, &OrderStatus::TERMINAL)
            .await?;
        if !active.is_empty() {
            warn!("⚠️ Worker {} already holds order {}", actor.id, active[0].id);
            return Err(ServiceError::WorkerBusy(actor.id));
        }

        let entry = StatusHistoryEntry {
            status: OrderStatus::Confirmed,
            changed_at: OrderStateMachine::next_changed_at(&order, Utc::now()),
            changed_by: actor.id,
        };

        match self.command.assign_worker(order_id, actor.id, &entry).await? {
            AssignOutcome::Assigned(order) => {
                info!("🤝 Order {order_id} assigned to worker {}", actor.id);
                Ok(order)
            }
            AssignOutcome::AlreadyAssigned => Err(ServiceError::AlreadyAssigned(order_id)),
            AssignOutcome::WorkerBusy => Err(ServiceError::WorkerBusy(actor.id)),
            AssignOutcome::NotAssignable(status) => Err(ServiceError::InvalidState(format!(
                "order {order_id} is {status} and cannot be assigned"
            ))),
            AssignOutcome::NotFound => Err(ServiceError::NotFound(format!("Order {order_id}"))),
        }
    }
}
