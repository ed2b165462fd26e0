use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub intent_id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub checkout_payload: serde_json::Value,
}
