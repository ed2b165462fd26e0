use crate::domain::requests::order::CreateOrderLineRequest;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    #[validate(length(min = 1, max = 50), nested)]
    pub lines: Vec<CreateOrderLineRequest>,
}
