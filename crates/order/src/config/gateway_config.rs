use anyhow::{Context, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub key_id: String,
    pub key_secret: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn init() -> Result<Self> {
        let base_url = std::env::var("GATEWAY_BASE_URL")
            .unwrap_or_else(|_| "https://api.razorpay.com".to_string());
        let key_id = std::env::var("GATEWAY_KEY_ID")
            .context("Missing environment variable: GATEWAY_KEY_ID")?;
        let key_secret = std::env::var("GATEWAY_KEY_SECRET")
            .context("Missing environment variable: GATEWAY_KEY_SECRET")?;

        let timeout_secs: u64 = std::env::var("GATEWAY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .context("Unable to parse GATEWAY_TIMEOUT_SECS as u64")?;

        Ok(Self {
            base_url,
            key_id,
            key_secret,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
