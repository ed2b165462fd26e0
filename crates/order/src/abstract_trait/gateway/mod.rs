use crate::domain::requests::order::PaymentProof;
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynPaymentGateway = Arc<dyn PaymentGatewayTrait + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntent {
    pub intent_id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub checkout_payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefundReceipt {
    pub refund_id: String,
    pub amount: i64,
}

#[async_trait]
pub trait PaymentGatewayTrait {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentIntent, ServiceError>;

    fn verify(&self, proof: &PaymentProof) -> Result<(), ServiceError>;

    async fn refund(&self, payment_id: &str, amount: i64) -> Result<RefundReceipt, ServiceError>;
}
