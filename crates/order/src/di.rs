use crate::{
    abstract_trait::{
        gateway::DynPaymentGateway,
        notifier::DynStatusNotifier,
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::{DynOrderCommandService, DynOrderQueryService},
        },
        product::{DynProductCommandRepository, DynProductQueryRepository},
    },
    config::gateway_config::GatewayConfig,
    gateway::RazorpayGateway,
    notifier::KafkaStatusNotifier,
    repository::{
        InMemoryStore,
        order::{OrderCommandRepository, OrderQueryRepository},
        product::{ProductCommandRepository, ProductQueryRepository},
    },
    service::order::{OrderCommandService, OrderCommandServiceDeps, OrderQueryService, OrderSettings},
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{abstract_trait::DynKafka, config::ConnectionPool};
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct DependenciesInject {
    pub order_query: DynOrderQueryService,
    pub order_command: DynOrderCommandService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("order_query", &"OrderQueryService")
            .field("order_command", &"OrderCommandService")
            .finish()
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub product_query: DynProductQueryRepository,
    pub product_command: DynProductCommandRepository,
    pub order_query: DynOrderQueryRepository,
    pub order_command: DynOrderCommandRepository,
    pub gateway: DynPaymentGateway,
    pub notifier: DynStatusNotifier,
    pub settings: OrderSettings,
}

impl DependenciesInjectDeps {
    pub fn postgres(
        pool: ConnectionPool,
        kafka: DynKafka,
        gateway: &GatewayConfig,
        settings: OrderSettings,
    ) -> Result<Self> {
        let gateway = RazorpayGateway::new(gateway).context("Failed to build payment gateway")?;

        Ok(Self {
            product_query: Arc::new(ProductQueryRepository::new(pool.clone())),
            product_command: Arc::new(ProductCommandRepository::new(pool.clone())),
            order_query: Arc::new(OrderQueryRepository::new(pool.clone())),
            order_command: Arc::new(OrderCommandRepository::new(pool)),
            gateway: Arc::new(gateway),
            notifier: Arc::new(KafkaStatusNotifier::new(kafka)),
            settings,
        })
    }

    pub fn in_memory(
        store: InMemoryStore,
        gateway: DynPaymentGateway,
        notifier: DynStatusNotifier,
        settings: OrderSettings,
    ) -> Self {
        Self {
            product_query: Arc::new(store.clone()),
            product_command: Arc::new(store.clone()),
            order_query: Arc::new(store.clone()),
            order_command: Arc::new(store),
            gateway,
            notifier,
            settings,
        }
    }
}

impl DependenciesInject {
    pub async fn new(deps: DependenciesInjectDeps, registry: Arc<Mutex<Registry>>) -> Self {
        let DependenciesInjectDeps {
            product_query,
            product_command,
            order_query,
            order_command,
            gateway,
            notifier,
            settings,
        } = deps;

        let order_query_service: DynOrderQueryService =
            Arc::new(OrderQueryService::new(order_query.clone(), registry.clone()).await);

        let order_command_service: DynOrderCommandService = Arc::new(
            OrderCommandService::new(OrderCommandServiceDeps {
                product_query,
                product_command,
                query: order_query,
                command: order_command,
                gateway,
                notifier,
                settings,
                registry,
            })
            .await,
        );

        Self {
            order_query: order_query_service,
            order_command: order_command_service,
        }
    }
}
