//! Page-draining loop with generation-token cancellation

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::FetchError;
use crate::api::dto::PoleRecord;
use crate::config::ClientConfig;
use crate::domain::BoundingBox;

/// Uniform page envelope the loop consumes, whatever the wire shape was.
#[derive(Debug, Clone, PartialEq)]
pub struct PageEnvelope {
    pub total: u64,
    pub records: Vec<PoleRecord>,
}

/// Anything that can serve one page of a bounding-box query.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(
        &self,
        bbox: &BoundingBox,
        page: u32,
        limit: u32,
    ) -> Result<PageEnvelope, FetchError>;
}

/// Monotonically increasing counter shared between loops over the same
/// view. Starting a loop bumps it; an older loop notices the bump at
/// its next checkpoint and stops without applying the stale page.
#[derive(Clone, Debug, Default)]
pub struct GenerationToken(Arc<AtomicU64>);

impl GenerationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump the generation and return the new value as this loop's
    /// snapshot.
    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, snapshot: u64) -> bool {
        self.current() == snapshot
    }
}

/// How a loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// All pages were drained: either `fetched` reached the reported
    /// total, or a page came back empty (defense against a total that
    /// disagrees with the data).
    Complete { fetched: u64, total: u64 },
    /// A newer loop started; this one stopped without applying the
    /// stale page.
    Superseded,
}

/// Serialized page fetcher: one request in flight at a time, a fixed
/// pacing delay between pages (pacing, not retry).
pub struct FetchLoop<S> {
    source: S,
    generation: GenerationToken,
    page_limit: u32,
    page_delay: Duration,
}

impl<S: PageSource> FetchLoop<S> {
    pub fn new(
        source: S,
        generation: GenerationToken,
        page_limit: u32,
        page_delay: Duration,
    ) -> Self {
        Self {
            source,
            generation,
            page_limit,
            page_delay,
        }
    }

    /// Build a loop from the `[client]` config section.
    pub fn from_config(source: S, generation: GenerationToken, config: &ClientConfig) -> Self {
        Self::new(
            source,
            generation,
            config.page_limit,
            Duration::from_millis(config.page_delay_ms),
        )
    }

    /// Drain all pages for `bbox`, handing each batch to `apply`.
    ///
    /// The first request failure aborts the loop and propagates;
    /// batches already applied stay applied. A bump of the generation
    /// token stops the loop before the stale page reaches `apply`.
    pub async fn run<F>(&self, bbox: &BoundingBox, mut apply: F) -> Result<FetchOutcome, FetchError>
    where
        F: FnMut(Vec<PoleRecord>),
    {
        let snapshot = self.generation.begin();
        let mut fetched: u64 = 0;
        let mut page: u32 = 1;

        loop {
            let envelope = self.source.fetch_page(bbox, page, self.page_limit).await?;

            // Checkpoint: a newer loop may have started while the
            // request was in flight.
            if !self.generation.is_current(snapshot) {
                debug!("Fetch loop superseded at page {}", page);
                return Ok(FetchOutcome::Superseded);
            }

            let total = envelope.total;
            if envelope.records.is_empty() {
                return Ok(FetchOutcome::Complete { fetched, total });
            }

            fetched += envelope.records.len() as u64;
            apply(envelope.records);

            if fetched >= total {
                return Ok(FetchOutcome::Complete { fetched, total });
            }

            page += 1;
            tokio::time::sleep(self.page_delay).await;
            if !self.generation.is_current(snapshot) {
                debug!("Fetch loop superseded before page {}", page);
                return Ok(FetchOutcome::Superseded);
            }
        }
    }
}
