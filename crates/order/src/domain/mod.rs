pub mod actor;
pub mod event;
pub mod requests;
pub mod response;
pub mod snapshot;
pub mod status;
pub mod stock;
