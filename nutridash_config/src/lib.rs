mod schema;

pub use schema::{Config, DatabaseConfig, ListenerConfig, ServerConfig};
