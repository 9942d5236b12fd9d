//! In-memory repository for development and testing

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::pole::{BoundingBox, PageRequest, Pole, PoleRepository};
use crate::domain::{DomainError, DomainResult};

/// Keeps poles in an id-ordered map so paging matches the database's
/// id-ascending contract exactly.
#[derive(Default)]
pub struct InMemoryPoleRepository {
    poles: RwLock<BTreeMap<i64, Pole>>,
}

impl InMemoryPoleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, mut pole: Pole) {
        pole.companies.sort();
        pole.companies.dedup();
        self.poles
            .write()
            .expect("pole map lock poisoned")
            .insert(pole.id, pole);
    }

    pub fn len(&self) -> usize {
        self.poles.read().expect("pole map lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PoleRepository for InMemoryPoleRepository {
    async fn count_in_bounds(&self, bbox: &BoundingBox) -> DomainResult<u64> {
        let poles = self
            .poles
            .read()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(poles
            .values()
            .filter(|p| bbox.contains(p.latitude, p.longitude))
            .count() as u64)
    }

    async fn find_page_in_bounds(
        &self,
        bbox: &BoundingBox,
        page: &PageRequest,
    ) -> DomainResult<Vec<Pole>> {
        let poles = self
            .poles
            .read()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(poles
            .values()
            .filter(|p| bbox.contains(p.latitude, p.longitude))
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageLimits;

    fn sample_pole(id: i64, lat: f64, lng: f64) -> Pole {
        Pole {
            id,
            municipality: "São Paulo".to_string(),
            neighborhood: "Centro".to_string(),
            street: "Rua A".to_string(),
            material: "concreto".to_string(),
            height: 9.0,
            mechanical_tension: 300.0,
            latitude: lat,
            longitude: lng,
            companies: vec!["CPFL".to_string()],
        }
    }

    fn repo_with_grid() -> InMemoryPoleRepository {
        let repo = InMemoryPoleRepository::new();
        // Ten poles strung along a street inside the box, two outside
        for i in 0..10 {
            repo.insert(sample_pole(i, -23.20 - 0.001 * i as f64, -46.60));
        }
        repo.insert(sample_pole(100, -10.0, -46.60));
        repo.insert(sample_pole(101, -23.20, -40.0));
        repo
    }

    #[tokio::test]
    async fn count_ignores_poles_outside_bounds() {
        let repo = repo_with_grid();
        let bbox = BoundingBox::new(-23.3, -23.1, -46.7, -46.5);
        assert_eq!(repo.count_in_bounds(&bbox).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn pages_are_id_ordered_and_disjoint() {
        let repo = repo_with_grid();
        let bbox = BoundingBox::new(-23.3, -23.1, -46.7, -46.5);
        let limits = PageLimits {
            default_limit: 4,
            min_limit: 1,
            max_limit: 4,
        };

        let mut seen = Vec::new();
        for page_no in 1..=3 {
            let page = PageRequest::from_raw(Some(&page_no.to_string()), None, &limits);
            let batch = repo.find_page_in_bounds(&bbox, &page).await.unwrap();
            seen.extend(batch.into_iter().map(|p| p.id));
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[tokio::test]
    async fn insert_dedups_and_sorts_companies() {
        let repo = InMemoryPoleRepository::new();
        let mut pole = sample_pole(1, -23.2, -46.6);
        pole.companies = vec![
            "Vivo".to_string(),
            "CPFL".to_string(),
            "Vivo".to_string(),
        ];
        repo.insert(pole);

        let bbox = BoundingBox::new(-23.3, -23.1, -46.7, -46.5);
        let page = PageRequest::from_raw(None, None, &PageLimits::default());
        let poles = repo.find_page_in_bounds(&bbox, &page).await.unwrap();
        assert_eq!(poles[0].companies, vec!["CPFL", "Vivo"]);
        assert_eq!(poles[0].company_count(), 2);
    }
}
