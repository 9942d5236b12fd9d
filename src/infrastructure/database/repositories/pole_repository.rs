//! SeaORM implementation of PoleRepository

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::debug;

use crate::domain::pole::{BoundingBox, PageRequest, Pole, PoleRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{pole, pole_company};

/// Repository over an injected connection. The connection is created
/// once at startup and closed at shutdown; nothing here touches
/// ambient globals.
pub struct SeaOrmPoleRepository {
    db: DatabaseConnection,
    statement_timeout: Duration,
}

impl SeaOrmPoleRepository {
    pub fn new(db: DatabaseConnection, statement_timeout: Duration) -> Self {
        Self {
            db,
            statement_timeout,
        }
    }

    /// Run one statement under the configured time budget. SQLite has
    /// no server-side statement timeout, so the budget is enforced
    /// around the statement future; an elapsed timer surfaces as the
    /// distinct timeout error instead of an open-ended hang.
    async fn bounded<F, T>(&self, fut: F) -> DomainResult<T>
    where
        F: Future<Output = Result<T, sea_orm::DbErr>>,
    {
        match tokio::time::timeout(self.statement_timeout, fut).await {
            Ok(result) => result.map_err(db_err),
            Err(_) => Err(DomainError::QueryTimeout),
        }
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

fn in_bounds(bbox: &BoundingBox) -> sea_orm::Select<pole::Entity> {
    pole::Entity::find()
        .filter(pole::Column::Latitude.between(bbox.south, bbox.north))
        .filter(pole::Column::Longitude.between(bbox.west, bbox.east))
}

fn model_to_domain(p: pole::Model, companies: Vec<String>) -> Pole {
    Pole {
        id: p.id,
        municipality: p.municipality,
        neighborhood: p.neighborhood,
        street: p.street,
        material: p.material,
        height: p.height,
        mechanical_tension: p.mechanical_tension,
        latitude: p.latitude,
        longitude: p.longitude,
        companies,
    }
}

#[async_trait]
impl PoleRepository for SeaOrmPoleRepository {
    async fn count_in_bounds(&self, bbox: &BoundingBox) -> DomainResult<u64> {
        self.bounded(in_bounds(bbox).count(&self.db)).await
    }

    async fn find_page_in_bounds(
        &self,
        bbox: &BoundingBox,
        page: &PageRequest,
    ) -> DomainResult<Vec<Pole>> {
        debug!(
            "Fetching poles page {} (limit {}) in {:?}",
            page.page, page.limit, bbox
        );

        let models = self
            .bounded(
                in_bounds(bbox)
                    .order_by_asc(pole::Column::Id)
                    .offset(page.offset())
                    .limit(u64::from(page.limit))
                    .all(&self.db),
            )
            .await?;

        if models.is_empty() {
            return Ok(Vec::new());
        }

        // Aggregate companies for the page's ids only, never the full
        // bounding-box match set.
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let attachments = self
            .bounded(
                pole_company::Entity::find()
                    .filter(pole_company::Column::PoleId.is_in(ids))
                    .all(&self.db),
            )
            .await?;

        let mut by_pole: BTreeMap<i64, Vec<String>> = BTreeMap::new();
        for attachment in attachments {
            by_pole
                .entry(attachment.pole_id)
                .or_default()
                .push(attachment.company);
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let mut companies = by_pole.remove(&m.id).unwrap_or_default();
                companies.sort();
                companies.dedup();
                model_to_domain(m, companies)
            })
            .collect())
    }
}
