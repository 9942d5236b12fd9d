//! HTTP page source against the canonical poles endpoint

use std::time::Duration;

use async_trait::async_trait;

use super::compat;
use super::fetch::{PageEnvelope, PageSource};
use super::FetchError;
use crate::api::dto::PageResponse;
use crate::domain::BoundingBox;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Reqwest-backed [`PageSource`].
///
/// The default constructor expects the canonical response shape and
/// fails on anything else. [`HttpPoleClient::legacy_tolerant`] routes
/// bodies through the [`compat`] shim for pre-consolidation servers.
pub struct HttpPoleClient {
    http: reqwest::Client,
    base_url: String,
    legacy_tolerant: bool,
}

impl HttpPoleClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::build(base_url.into(), false)
    }

    /// Tolerate the drifted legacy response shapes. Only needed when
    /// talking to old deployments.
    pub fn legacy_tolerant(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::build(base_url.into(), true)
    }

    fn build(base_url: String, legacy_tolerant: bool) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            legacy_tolerant,
        })
    }
}

#[async_trait]
impl PageSource for HttpPoleClient {
    async fn fetch_page(
        &self,
        bbox: &BoundingBox,
        page: u32,
        limit: u32,
    ) -> Result<PageEnvelope, FetchError> {
        let url = format!("{}/api/poles", self.base_url);
        let bbox_param = format!("{},{},{},{}", bbox.west, bbox.south, bbox.east, bbox.north);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("bbox", bbox_param),
                ("page", page.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if self.legacy_tolerant {
            let value = response.json::<serde_json::Value>().await?;
            compat::normalize(value)
        } else {
            let page: PageResponse = response.json().await?;
            Ok(PageEnvelope {
                total: page.total,
                records: page.data,
            })
        }
    }
}
