use super::gateway_config::GatewayConfig;
use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub run_migrations: bool,
    pub port: u16,
    pub kafka_broker: String,
    pub db_max_conn: u32,
    pub db_min_conn: u32,
    pub shipping_fee: i64,
    pub currency: String,
    pub gateway: GatewayConfig,
    pub is_dev: bool,
    pub enable_file_log: bool,
    pub otel_endpoint: String,
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;
        let jwt_secret =
            std::env::var("JWT_SECRET").context("Missing environment variable: JWT_SECRET")?;
        let run_migrations_str = std::env::var("RUN_MIGRATIONS")
            .context("Missing environment variable: RUN_MIGRATIONS")?;
        let port_str = std::env::var("PORT").context("Missing environment variable: PORT")?;

        let kafka_broker = std::env::var("KAFKA").context("Missing environment variable: KAFKA")?;

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let db_max_conn: u32 = std::env::var("DB_MAX_CONNECTION")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MAX_CONNECTION as u32")?;

        let db_min_conn: u32 = std::env::var("DB_MIN_CONNECTION")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MIN_CONNECTION as u32")?;

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let shipping_fee: i64 = std::env::var("SHIPPING_FEE")
            .unwrap_or_else(|_| "0".to_string())
            .parse::<i64>()
            .context("Unable to parse SHIPPING_FEE as i64")?;
        if shipping_fee < 0 {
            return Err(anyhow!("SHIPPING_FEE must not be negative, got {shipping_fee}"));
        }

        let currency = std::env::var("CURRENCY").unwrap_or_else(|_| "INR".to_string());

        let gateway = GatewayConfig::init().context("Failed to load payment gateway config")?;

        let otel_endpoint = std::env::var("OTEL_ENDPOINT")
            .unwrap_or_else(|_| "http://otel-collector:4317".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            run_migrations,
            port,
            kafka_broker,
            db_max_conn,
            db_min_conn,
            shipping_fee,
            currency,
            gateway,
            is_dev: env_flag("DEV_MODE"),
            enable_file_log: env_flag("ENABLE_FILE_LOG"),
            otel_endpoint,
        })
    }
}
