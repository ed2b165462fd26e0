use crate::{
    domain::{
        requests::order::Address,
        snapshot::SnapshotView,
        status::{OrderStatus, PaymentMethod},
    },
    model::order::{CurrentStatus, Order, OrderLine, RefundDetails, StatusHistoryEntry},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub product_id: Uuid,
    pub qty: i32,
    pub price_at_purchase: i64,
    pub snapshot: SnapshotView,
}

impl From<&OrderLine> for OrderLineResponse {
    fn from(line: &OrderLine) -> Self {
        Self {
            product_id: line.product_id,
            qty: line.qty,
            price_at_purchase: line.price_at_purchase,
            snapshot: line.snapshot.view(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub buyer_id: Uuid,
    pub status: OrderStatus,
    pub current_status: CurrentStatus,
    pub payment_method: PaymentMethod,
    pub shipping_fee: i64,
    pub total: i64,
    pub lines: Vec<OrderLineResponse>,
    pub address: Address,
    pub assigned_to: Option<Uuid>,
    pub status_history: Vec<StatusHistoryEntry>,
    pub payment_id: Option<String>,
    pub refund_details: Option<RefundDetails>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub snapshot_version: String,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id,
            buyer_id: order.buyer_id,
            status: order.status,
            current_status: order.current_status,
            payment_method: order.payment_method,
            shipping_fee: order.shipping_fee,
            total: order.total,
            lines: order.lines.iter().map(OrderLineResponse::from).collect(),
            address: order.address,
            assigned_to: order.assigned_to,
            status_history: order.status_history,
            payment_id: order.payment_details.map(|details| details.payment_id),
            refund_details: order.refund_details,
            cancelled_at: order.cancelled_at,
            snapshot_version: order.snapshot_version,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderResponse {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub refund_details: Option<RefundDetails>,
}

impl From<&Order> for CancelOrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            status: order.status,
            refund_details: order.refund_details.clone(),
        }
    }
}
