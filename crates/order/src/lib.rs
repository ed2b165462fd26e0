pub mod abstract_trait;
pub mod config;
pub mod di;
pub mod domain;
pub mod gateway;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod notifier;
pub mod repository;
pub mod service;
pub mod state;
