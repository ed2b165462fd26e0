pub mod gateway;
pub mod notifier;
pub mod order;
pub mod product;
