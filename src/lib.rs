//! # Poste Map Service
//!
//! Bounding-box paginated query API for utility-pole records, plus the
//! client-side fetch loop that drains all pages for a viewport.
//!
//! ## Architecture
//!
//! - **domain**: pole model, bounding-box/pagination types, error
//!   taxonomy, repository trait
//! - **infrastructure**: SeaORM persistence, migrations, in-memory
//!   repository for tests
//! - **api**: REST endpoint with Swagger documentation
//! - **client**: paginated fetch loop with generation-token
//!   cancellation and the legacy-response compatibility shim
//! - **shared**: graceful shutdown coordination

pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmPoleRepository};

// Re-export API router
pub use api::create_api_router;
