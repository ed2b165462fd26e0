pub mod gateway_config;
pub mod myconfig;
