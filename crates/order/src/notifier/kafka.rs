use crate::{
    abstract_trait::notifier::StatusNotifierTrait,
    domain::event::{ORDER_EVENTS_TOPIC, OrderEvent},
};
use shared::abstract_trait::DynKafka;
use tracing::{error, info};

#[derive(Clone)]
pub struct KafkaStatusNotifier {
    kafka: DynKafka,
}

impl KafkaStatusNotifier {
    pub fn new(kafka: DynKafka) -> Self {
        Self { kafka }
    }
}

impl StatusNotifierTrait for KafkaStatusNotifier {
    fn notify(&self, event: OrderEvent) {
        let payload = match serde_json::to_vec(&event) {
            Ok(payload) => payload,
            Err(e) => {
                error!("❌ Failed to serialize order event: {e}");
                return;
            }
        };

        let kafka = self.kafka.clone();
        let key = event.order_id().to_string();

        tokio::spawn(async move {
            match kafka.publish(ORDER_EVENTS_TOPIC, &key, &payload).await {
                Ok(()) => info!("📨 Published order event for {key}"),
                Err(e) => error!("❌ Failed to publish order event for {key}: {e}"),
            }
        });
    }
}
