use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: Uuid,
    pub name: String,
    pub description: String,
    pub weight: Option<f64>,
    pub price: i64,
    pub quantity: i32,
    pub sold: i32,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub seller_id: Option<Uuid>,
    pub seller_name: Option<String>,
    pub image_id: Option<String>,
    pub image_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
