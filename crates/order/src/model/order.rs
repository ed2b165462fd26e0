use crate::domain::{
    requests::order::{Address, PaymentProof},
    snapshot::LineSnapshot,
    status::{OrderStatus, PaymentMethod},
    stock::StockLine,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::errors::RepositoryError;
use sqlx::{FromRow, types::Json};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: Uuid,
    pub qty: i32,
    pub price_at_purchase: i64,
    pub snapshot: LineSnapshot,
}

impl OrderLine {
    pub fn subtotal(&self) -> Option<i64> {
        self.price_at_purchase.checked_mul(i64::from(self.qty))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    pub status: OrderStatus,
    pub changed_at: DateTime<Utc>,
    pub changed_by: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStatus {
    pub status: OrderStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub gateway_intent_id: String,
    pub payment_id: String,
    pub signature: String,
}

impl From<PaymentProof> for PaymentDetails {
    fn from(proof: PaymentProof) -> Self {
        Self {
            gateway_intent_id: proof.intent_id,
            payment_id: proof.payment_id,
            signature: proof.signature,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RefundStatus {
    Processed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefundDetails {
    pub refund_id: Option<String>,
    pub amount: i64,
    pub status: RefundStatus,
    pub error: bool,
    pub error_message: Option<String>,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub lines: Vec<OrderLine>,
    pub address: Address,
    pub payment_method: PaymentMethod,
    pub shipping_fee: i64,
    pub total: i64,
    pub status: OrderStatus,
    pub assigned_to: Option<Uuid>,
    pub status_history: Vec<StatusHistoryEntry>,
    pub current_status: CurrentStatus,
    pub payment_details: Option<PaymentDetails>,
    pub refund_details: Option<RefundDetails>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub snapshot_version: String,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn last_changed_at(&self) -> Option<DateTime<Utc>> {
        self.status_history.last().map(|entry| entry.changed_at)
    }

    pub fn stock_lines(&self) -> Vec<StockLine> {
        self.lines
            .iter()
            .map(|line| StockLine {
                product_id: line.product_id,
                qty: line.qty,
            })
            .collect()
    }

    pub fn has_captured_payment(&self) -> bool {
        self.payment_method == PaymentMethod::Online && self.payment_details.is_some()
    }

    pub fn apply_patch(&mut self, patch: &OrderPatch, now: DateTime<Utc>) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(worker_id) = patch.assigned_to {
            self.assigned_to = Some(worker_id);
        }
        if let Some(entry) = &patch.history {
            self.current_status = CurrentStatus {
                status: entry.status,
                updated_at: entry.changed_at,
            };
            self.status_history.push(entry.clone());
        }
        if let Some(refund) = &patch.refund_details {
            self.refund_details = Some(refund.clone());
        }
        if let Some(cancelled_at) = patch.cancelled_at {
            self.cancelled_at = Some(cancelled_at);
        }
        self.version += 1;
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub assigned_to: Option<Uuid>,
    pub history: Option<StatusHistoryEntry>,
    pub refund_details: Option<RefundDetails>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
pub struct OrderRow {
    pub order_id: Uuid,
    pub buyer_id: Uuid,
    pub lines: Json<Vec<OrderLine>>,
    pub address: Json<Address>,
    pub payment_method: String,
    pub shipping_fee: i64,
    pub total: i64,
    pub status: String,
    pub assigned_to: Option<Uuid>,
    pub status_history: Json<Vec<StatusHistoryEntry>>,
    pub status_updated_at: DateTime<Utc>,
    pub payment_details: Option<Json<PaymentDetails>>,
    pub refund_details: Option<Json<RefundDetails>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub snapshot_version: String,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row.status.parse().map_err(RepositoryError::Custom)?;
        let payment_method: PaymentMethod =
            row.payment_method.parse().map_err(RepositoryError::Custom)?;

        Ok(Order {
            id: row.order_id,
            buyer_id: row.buyer_id,
            lines: row.lines.0,
            address: row.address.0,
            payment_method,
            shipping_fee: row.shipping_fee,
            total: row.total,
            status,
            assigned_to: row.assigned_to,
            status_history: row.status_history.0,
            current_status: CurrentStatus {
                status,
                updated_at: row.status_updated_at,
            },
            payment_details: row.payment_details.map(|json| json.0),
            refund_details: row.refund_details.map(|json| json.0),
            cancelled_at: row.cancelled_at,
            snapshot_version: row.snapshot_version,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
