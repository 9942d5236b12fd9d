pub mod common;
pub mod pole;

pub use common::{ApiError, ErrorResponse};
pub use pole::{PageResponse, PoleRecord, PolesQuery};
