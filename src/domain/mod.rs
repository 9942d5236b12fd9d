//! Core business entities, types and traits

pub mod error;
pub mod pole;

pub use error::{DomainError, DomainResult};
pub use pole::{BoundingBox, PageLimits, PageRequest, Pole, PoleRepository};
