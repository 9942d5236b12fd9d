//! Pole repository interface

use async_trait::async_trait;

use super::model::{BoundingBox, PageRequest, Pole};
use crate::domain::DomainResult;

#[async_trait]
pub trait PoleRepository: Send + Sync {
    /// Count every pole inside the bounding box, independent of paging.
    async fn count_in_bounds(&self, bbox: &BoundingBox) -> DomainResult<u64>;

    /// Fetch one page of poles inside the bounding box, ordered by id
    /// ascending at offset `(page - 1) * limit`. Company names are
    /// aggregated (distinct, sorted) for the returned slice only.
    async fn find_page_in_bounds(
        &self,
        bbox: &BoundingBox,
        page: &PageRequest,
    ) -> DomainResult<Vec<Pole>>;
}
