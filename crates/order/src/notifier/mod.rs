mod kafka;

pub use self::kafka::KafkaStatusNotifier;
