//! External concerns: database, in-memory storage

pub mod database;
pub mod storage;

pub use database::{init_database, DatabaseConfig, SeaOrmPoleRepository};
pub use storage::InMemoryPoleRepository;
