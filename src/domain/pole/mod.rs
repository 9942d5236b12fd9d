pub mod model;
pub mod repository;

pub use model::{BoundingBox, PageLimits, PageRequest, Pole};
pub use repository::PoleRepository;
