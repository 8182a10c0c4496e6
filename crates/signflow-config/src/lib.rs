//! # Signflow Config
//!
//! Configuration types for the Signflow console, loaded from environment
//! variables (a `.env` file is read by the binaries through `dotenvy`):
//!
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: PostgreSQL connection settings
//! - [`server`]: bind address and logging settings
//!
//! # Example
//!
//! ```ignore
//! use signflow_config::{CorsConfig, DatabaseConfig, ServerConfig};
//!
//! let cors_config = CorsConfig::from_env();
//! let database_config = DatabaseConfig::from_env()?;
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use server::ServerConfig;
