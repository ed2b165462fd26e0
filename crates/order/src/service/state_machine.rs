use crate::{
    domain::{
        actor::{Actor, Role},
        status::OrderStatus,
    },
    model::order::{Order, OrderPatch, StatusHistoryEntry},
};
use chrono::{DateTime, Duration, Utc};
use shared::errors::ServiceError;

pub struct OrderStateMachine;

impl OrderStateMachine {
    // strictly increasing even when the clock is not
    pub fn next_changed_at(order: &Order, now: DateTime<Utc>) -> DateTime<Utc> {
        match order.last_changed_at() {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        }
    }

    pub fn plan(
        order: &Order,
        requested: OrderStatus,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<OrderPatch, ServiceError> {
        if requested == OrderStatus::Confirmed {
            return Err(ServiceError::Forbidden(
                "confirmation happens through assignment".into(),
            ));
        }

        if !order.status.can_transition_to(requested) {
            return Err(ServiceError::InvalidState(format!(
                "cannot move order {} from {} to {}",
                order.id, order.status, requested
            )));
        }

        Self::authorize(order, requested, actor)?;

        let changed_at = Self::next_changed_at(order, now);

        Ok(OrderPatch {
            status: Some(requested),
            history: Some(StatusHistoryEntry {
                status: requested,
                changed_at,
                changed_by: actor.id,
            }),
            cancelled_at: (requested == OrderStatus::Cancelled).then_some(changed_at),
            ..Default::default()
        })
    }

    fn authorize(order: &Order, requested: OrderStatus, actor: &Actor) -> Result<(), ServiceError> {
        match requested {
            OrderStatus::Cancelled => {
                if actor.role == Role::Buyer && actor.id == order.buyer_id {
                    Ok(())
                } else {
                    Err(ServiceError::Forbidden(
                        "only the buyer may cancel this order".into(),
                    ))
                }
            }
            OrderStatus::Shipped | OrderStatus::Delivered => {
                if actor.role == Role::Worker && order.assigned_to == Some(actor.id) {
                    Ok(())
                } else {
                    Err(ServiceError::Forbidden(
                        "only the assigned worker may advance this order".into(),
                    ))
                }
            }
            OrderStatus::OrderPlaced | OrderStatus::Confirmed => Err(ServiceError::Forbidden(
                format!("{requested} cannot be requested"),
            )),
        }
    }
}
