use super::signature::verify_payment_signature;
use crate::{
    abstract_trait::gateway::{PaymentGatewayTrait, PaymentIntent, RefundReceipt},
    config::gateway_config::GatewayConfig,
    domain::requests::order::PaymentProof,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use shared::errors::ServiceError;
use tracing::{error, info, warn};

// whole units to paise
const MINOR_UNITS: i64 = 100;

#[derive(Debug, Deserialize)]
struct ProviderOrder {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ProviderRefund {
    id: String,
}

#[derive(Debug, Clone)]
pub struct RazorpayGateway {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Internal(format!("failed to build gateway client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        })
    }

    fn transport_error(context: &str, err: reqwest::Error) -> ServiceError {
        let retryable = err.is_timeout() || err.is_connect();
        error!("❌ Gateway {context} failed: {err}");
        ServiceError::Gateway {
            message: format!("{context} failed: {err}"),
            retryable,
        }
    }

    fn status_error(context: &str, status: StatusCode, body: &str) -> ServiceError {
        error!("❌ Gateway {context} returned {status}: {body}");
        ServiceError::Gateway {
            message: format!("{context} returned {status}"),
            retryable: status.is_server_error(),
        }
    }

    fn to_minor(amount: i64) -> Result<i64, ServiceError> {
        amount
            .checked_mul(MINOR_UNITS)
            .ok_or_else(|| ServiceError::Validation(vec!["amount is too large".into()]))
    }
}

#[async_trait]
impl PaymentGatewayTrait for RazorpayGateway {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentIntent, ServiceError> {
        let minor = Self::to_minor(amount)?;

        let response = self
            .client
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&json!({
                "amount": minor,
                "currency": currency,
                "receipt": receipt,
            }))
            .send()
            .await
            .map_err(|e| Self::transport_error("create intent", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::status_error("create intent", status, &body));
        }

        let order: ProviderOrder = response
            .json()
            .await
            .map_err(|e| Self::transport_error("create intent", e))?;

        info!("💳 Created payment intent {} for receipt {receipt}", order.id);

        Ok(PaymentIntent {
            checkout_payload: json!({
                "key": self.key_id,
                "amount": minor,
                "currency": currency,
                "order_id": order.id,
            }),
            intent_id: order.id,
            amount,
            currency: currency.to_string(),
            receipt: receipt.to_string(),
        })
    }

    fn verify(&self, proof: &PaymentProof) -> Result<(), ServiceError> {
        if verify_payment_signature(
            &self.key_secret,
            &proof.intent_id,
            &proof.payment_id,
            &proof.signature,
        ) {
            return Ok(());
        }

        warn!(
            target: "security",
            intent_id = %proof.intent_id,
            payment_id = %proof.payment_id,
            "🚨 Payment signature mismatch"
        );
        Err(ServiceError::PaymentVerificationFailed)
    }

    async fn refund(&self, payment_id: &str, amount: i64) -> Result<RefundReceipt, ServiceError> {
        let minor = Self::to_minor(amount)?;

        let response = self
            .client
            .post(format!("{}/v1/payments/{payment_id}/refund", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&json!({ "amount": minor }))
            .send()
            .await
            .map_err(|e| Self::transport_error("refund", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::status_error("refund", status, &body));
        }

        let refund: ProviderRefund = response
            .json()
            .await
            .map_err(|e| Self::transport_error("refund", e))?;

        info!("💸 Refunded {amount} on payment {payment_id} ({})", refund.id);

        Ok(RefundReceipt {
            refund_id: refund.id,
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::sign_payment;
    use std::time::Duration;

    fn gateway() -> RazorpayGateway {
        RazorpayGateway::new(&GatewayConfig {
            base_url: "http://127.0.0.1:9/".into(),
            key_id: "rzp_test".into(),
            key_secret: "topsecret".into(),
            timeout: Duration::from_millis(200),
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_is_normalized() {
        assert_eq!(gateway().base_url, "http://127.0.0.1:9");
    }

    #[test]
    fn test_verify_accepts_provider_signature() {
        let proof = PaymentProof {
            intent_id: "order_1".into(),
            payment_id: "pay_1".into(),
            signature: sign_payment("topsecret", "order_1", "pay_1").unwrap(),
        };

        assert!(gateway().verify(&proof).is_ok());
    }

    #[test]
    fn test_verify_rejects_forged_signature() {
        let proof = PaymentProof {
            intent_id: "order_1".into(),
            payment_id: "pay_1".into(),
            signature: sign_payment("guessed", "order_1", "pay_1").unwrap(),
        };

        assert!(matches!(
            gateway().verify(&proof),
            Err(ServiceError::PaymentVerificationFailed)
        ));
    }

    #[test]
    fn test_minor_unit_conversion_overflow_is_rejected() {
        assert_eq!(RazorpayGateway::to_minor(201).unwrap(), 20100);
        assert!(RazorpayGateway::to_minor(i64::MAX).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_a_retryable_gateway_error() {
        let err = gateway().create_intent(10, "INR", "rcpt-1").await.unwrap_err();

        assert!(matches!(err, ServiceError::Gateway { retryable: true, .. }));
    }
}
