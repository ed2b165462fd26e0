use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLine {
    pub product_id: Uuid,
    pub qty: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDelta {
    pub product_id: Uuid,
    pub delta: i32,
    pub qty_guard: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    pub product_id: Uuid,
    pub quantity_before: i32,
    pub quantity_after: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockUpdateOutcome {
    Applied(Vec<StockLevel>),
    Missing(Uuid),
    Insufficient { product_id: Uuid, available: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub product_id: Uuid,
    pub qty: i32,
    pub stock_before: i32,
}
