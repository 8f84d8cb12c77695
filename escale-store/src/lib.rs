pub mod app_config;
pub mod client;
pub mod fallback;
pub mod redis_repo;
pub mod upstream;

pub use client::{ApiClient, ClientError};
pub use fallback::CatalogueReader;
pub use redis_repo::RedisClient;
pub use upstream::HttpBackend;
