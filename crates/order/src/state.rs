use crate::{
    config::myconfig::Config,
    di::{DependenciesInject, DependenciesInjectDeps},
    service::order::OrderSettings,
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynJwtService, DynKafka},
    config::{ConnectionPool, JwtConfig, Kafka},
};
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub jwt_config: DynJwtService,
    pub registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("deps", &self.di_container)
            .field("jwt_config", &self.jwt_config)
            .finish()
    }
}

impl AppState {
    pub async fn new(pool: ConnectionPool, config: &Config) -> Result<Self> {
        let kafka = Arc::new(
            Kafka::new(&config.kafka_broker).context("Failed to create Kafka producer")?,
        ) as DynKafka;

        let settings = OrderSettings {
            shipping_fee: config.shipping_fee,
            currency: config.currency.clone(),
        };

        let deps = DependenciesInjectDeps::postgres(pool, kafka, &config.gateway, settings)?;

        Ok(Self::from_deps(deps, &config.jwt_secret).await)
    }

    pub async fn from_deps(deps: DependenciesInjectDeps, jwt_secret: &str) -> Self {
        let jwt_config = Arc::new(JwtConfig::new(jwt_secret)) as DynJwtService;
        let registry = Arc::new(Mutex::new(Registry::default()));

        let di_container = DependenciesInject::new(deps, registry.clone()).await;

        Self {
            di_container,
            jwt_config,
            registry,
        }
    }
}
