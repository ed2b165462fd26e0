use crate::domain::status::OrderStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ORDER_EVENTS_TOPIC: &str = "order.status_changed";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum OrderEvent {
    Created {
        order_id: Uuid,
        buyer_id: Uuid,
        total: i64,
    },
    StatusChanged {
        order_id: Uuid,
        buyer_id: Uuid,
        assigned_to: Option<Uuid>,
        status: OrderStatus,
        changed_by: Uuid,
        changed_at: DateTime<Utc>,
    },
}

impl OrderEvent {
    pub fn order_id(&self) -> Uuid {
        match self {
            OrderEvent::Created { order_id, .. } | OrderEvent::StatusChanged { order_id, .. } => {
                *order_id
            }
        }
    }
}
