//! Catalog API: marketplace backend library (sellers, products, reviews, statistics, reports).

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod mail;
pub mod migration;
pub mod models;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;

pub use config::Settings;
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use routes::app;
pub use state::AppState;
pub use store::{ensure_database_exists, init_schema};
