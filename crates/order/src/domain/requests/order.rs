use crate::domain::status::{OrderStatus, PaymentMethod};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ProductIdInput {
    Plain(Uuid),
    Wrapped { id: Uuid },
    Legacy { _id: Uuid },
}

impl From<ProductIdInput> for Uuid {
    fn from(input: ProductIdInput) -> Self {
        match input {
            ProductIdInput::Plain(id)
            | ProductIdInput::Wrapped { id }
            | ProductIdInput::Legacy { _id: id } => id,
        }
    }
}

fn canonical_product_id<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    ProductIdInput::deserialize(deserializer).map(Uuid::from)
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderLineRequest {
    #[serde(deserialize_with = "canonical_product_id")]
    pub product_id: Uuid,

    #[validate(range(min = 1, max = 10000))]
    pub qty: i32,

    #[serde(default)]
    pub price: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,

    #[validate(length(min = 5, max = 20))]
    pub phone: String,

    #[validate(length(min = 1, max = 200))]
    pub line1: String,

    #[serde(default)]
    pub line2: Option<String>,

    #[validate(length(min = 1, max = 80))]
    pub city: String,

    #[validate(length(min = 1, max = 80))]
    pub state: String,

    #[validate(length(min = 3, max = 12))]
    pub postal_code: String,

    #[validate(length(min = 2, max = 56))]
    pub country: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProof {
    #[validate(length(min = 1))]
    pub intent_id: String,

    #[validate(length(min = 1))]
    pub payment_id: String,

    #[validate(length(min = 1))]
    pub signature: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 50), nested)]
    pub lines: Vec<CreateOrderLineRequest>,

    #[validate(nested)]
    pub address: Address,

    pub payment_method: PaymentMethod,

    #[validate(nested)]
    #[serde(default)]
    pub payment_proof: Option<PaymentProof>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_product_id_shape_collapses_to_the_same_id() {
        let id = Uuid::new_v4();

        for product_id in [json!(id), json!({ "id": id }), json!({ "_id": id })] {
            let line: CreateOrderLineRequest =
                serde_json::from_value(json!({ "productId": product_id, "qty": 2 })).unwrap();
            assert_eq!(line.product_id, id);
            assert_eq!(line.price, None);
        }
    }

    #[test]
    fn test_unknown_product_id_shape_is_rejected() {
        let result = serde_json::from_value::<CreateOrderLineRequest>(
            json!({ "productId": { "sku": "A-1" }, "qty": 1 }),
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_zero_quantity_fails_validation() {
        let request: CreateOrderRequest = serde_json::from_value(json!({
            "lines": [{ "productId": Uuid::new_v4(), "qty": 0 }],
            "address": {
                "fullName": "Ada Buyer",
                "phone": "5550100",
                "line1": "1 Main St",
                "city": "Springfield",
                "state": "IL",
                "postalCode": "62701",
                "country": "US"
            },
            "paymentMethod": "COD"
        }))
        .unwrap();

        assert!(request.validate().is_err());
    }
}
