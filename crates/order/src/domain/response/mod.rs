pub mod api;
pub mod order;
pub mod payment;
