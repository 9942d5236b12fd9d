//! REST API: DTOs, handlers and router

pub mod dto;
pub mod handlers;
pub mod router;

pub use router::{create_api_router, ApiState};
