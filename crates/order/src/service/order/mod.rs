mod command;
mod query;

pub use self::command::{OrderCommandService, OrderCommandServiceDeps};
pub use self::query::OrderQueryService;

#[derive(Debug, Clone)]
pub struct OrderSettings {
    pub shipping_fee: i64,
    pub currency: String,
}
