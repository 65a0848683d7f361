//! Infrastructure layer: HTTP client, SQLite storage, configuration, logging
//! and console input.

pub mod config;
pub mod console;
pub mod database_connection;
pub mod http_client;
pub mod logging;
pub mod product_repository;

pub use config::{AppConfig, ConfigError};
pub use database_connection::DatabaseConnection;
pub use http_client::{HttpClientConfig, ProductApiClient};
pub use logging::init_logging_with_config;
pub use product_repository::ProductRepository;
