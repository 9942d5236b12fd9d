//! Wire DTOs for the poles endpoint

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::pole::{BoundingBox, PageLimits, PageRequest, Pole};
use crate::domain::{DomainError, DomainResult};

/// Query parameters for `GET /api/poles`.
///
/// Bounds come either as one `bbox` string or as the four discrete
/// parameters. Fields are raw strings so that malformed numbers reach
/// our validation (and its 400 taxonomy) instead of the framework's
/// generic deserialization failure.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PolesQuery {
    /// Compact bounds: `west,south,east,north`
    pub bbox: Option<String>,
    /// Southern latitude bound (used when `bbox` is absent)
    pub min_lat: Option<String>,
    /// Northern latitude bound
    pub max_lat: Option<String>,
    /// Western longitude bound
    pub min_lng: Option<String>,
    /// Eastern longitude bound
    pub max_lng: Option<String>,
    /// Page number, 1-based. Defaults to 1
    pub page: Option<String>,
    /// Page size, clamped into the configured range
    pub limit: Option<String>,
}

impl PolesQuery {
    /// Resolve whichever bound style the caller used. `bbox` wins when
    /// both are present.
    pub fn bounding_box(&self) -> DomainResult<BoundingBox> {
        if let Some(raw) = self.bbox.as_deref() {
            return BoundingBox::parse_csv(raw);
        }
        match (&self.min_lat, &self.max_lat, &self.min_lng, &self.max_lng) {
            (Some(min_lat), Some(max_lat), Some(min_lng), Some(max_lng)) => {
                BoundingBox::parse_discrete(min_lat, max_lat, min_lng, max_lng)
            }
            _ => Err(DomainError::InvalidBounds(
                "missing bbox or minLat/maxLat/minLng/maxLng".to_string(),
            )),
        }
    }

    pub fn page_request(&self, limits: &PageLimits) -> PageRequest {
        PageRequest::from_raw(self.page.as_deref(), self.limit.as_deref(), limits)
    }
}

/// One pole on the wire (camelCase per the canonical contract)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoleRecord {
    pub id: i64,
    pub municipality: String,
    pub neighborhood: String,
    pub street: String,
    pub material: String,
    pub height: f64,
    pub mechanical_tension: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Distinct company names, sorted ascending
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub company_count: u32,
}

impl PoleRecord {
    pub fn from_domain(pole: Pole) -> Self {
        let company_count = pole.company_count();
        Self {
            id: pole.id,
            municipality: pole.municipality,
            neighborhood: pole.neighborhood,
            street: pole.street,
            material: pole.material,
            height: pole.height,
            mechanical_tension: pole.mechanical_tension,
            latitude: pole.latitude,
            longitude: pole.longitude,
            companies: pole.companies,
            company_count,
        }
    }
}

/// The canonical page envelope: total reflects the full bounding-box
/// match; `data` is the id-ascending slice for the echoed page.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PageResponse {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub data: Vec<PoleRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_string_wins_over_discrete_params() {
        let query = PolesQuery {
            bbox: Some("-46.7,-23.3,-46.5,-23.1".to_string()),
            min_lat: Some("0".to_string()),
            max_lat: Some("1".to_string()),
            min_lng: Some("0".to_string()),
            max_lng: Some("1".to_string()),
            ..Default::default()
        };
        let bbox = query.bounding_box().unwrap();
        assert_eq!(bbox.south, -23.3);
        assert_eq!(bbox.west, -46.7);
    }

    #[test]
    fn missing_bounds_is_invalid() {
        let query = PolesQuery {
            min_lat: Some("-23.3".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            query.bounding_box(),
            Err(DomainError::InvalidBounds(_))
        ));
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = PoleRecord::from_domain(Pole {
            id: 7,
            municipality: "Osasco".to_string(),
            neighborhood: "Centro".to_string(),
            street: "Rua B".to_string(),
            material: "madeira".to_string(),
            height: 11.0,
            mechanical_tension: 600.0,
            latitude: -23.53,
            longitude: -46.79,
            companies: vec!["Claro".to_string(), "Vivo".to_string()],
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["mechanicalTension"], 600.0);
        assert_eq!(json["companyCount"], 2);
        assert_eq!(json["companies"][0], "Claro");
    }
}
