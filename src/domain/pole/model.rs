//! Pole domain model and bounding-box query types

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// A utility-pole record with its associated companies.
///
/// Coordinates are numeric columns; the legacy `"lat,lon"` string
/// storage was retired by migration to an indexed numeric schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pole {
    pub id: i64,
    pub municipality: String,
    pub neighborhood: String,
    pub street: String,
    pub material: String,
    pub height: f64,
    pub mechanical_tension: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Distinct company names attached to this pole, sorted ascending.
    pub companies: Vec<String>,
}

impl Pole {
    pub fn company_count(&self) -> u32 {
        self.companies.len() as u32
    }
}

/// Rectangular geographic region, normalized on construction so that
/// `south <= north` and `west <= east`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Build a bounding box, swapping bounds given in the wrong order.
    pub fn new(south: f64, north: f64, west: f64, east: f64) -> Self {
        let (south, north) = if south > north {
            (north, south)
        } else {
            (south, north)
        };
        let (west, east) = if west > east { (east, west) } else { (west, east) };
        Self {
            south,
            north,
            west,
            east,
        }
    }

    /// Parse the compact `"west,south,east,north"` form.
    pub fn parse_csv(raw: &str) -> DomainResult<Self> {
        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(DomainError::InvalidBounds(format!(
                "bbox expects 4 comma-separated values, got {}",
                parts.len()
            )));
        }
        let west = parse_bound("bbox[0]", parts[0])?;
        let south = parse_bound("bbox[1]", parts[1])?;
        let east = parse_bound("bbox[2]", parts[2])?;
        let north = parse_bound("bbox[3]", parts[3])?;
        Ok(Self::new(south, north, west, east))
    }

    /// Parse the four discrete bound parameters.
    pub fn parse_discrete(
        min_lat: &str,
        max_lat: &str,
        min_lng: &str,
        max_lng: &str,
    ) -> DomainResult<Self> {
        let south = parse_bound("minLat", min_lat)?;
        let north = parse_bound("maxLat", max_lat)?;
        let west = parse_bound("minLng", min_lng)?;
        let east = parse_bound("maxLng", max_lng)?;
        Ok(Self::new(south, north, west, east))
    }

    /// Area in square degrees. Never negative thanks to normalization.
    pub fn area(&self) -> f64 {
        (self.north - self.south) * (self.east - self.west)
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.south
            && latitude <= self.north
            && longitude >= self.west
            && longitude <= self.east
    }

    /// Guard against accidentally huge viewports before touching the store.
    pub fn check_area(&self, max_area: f64) -> DomainResult<()> {
        let area = self.area();
        if area > max_area {
            return Err(DomainError::AreaTooLarge {
                area,
                max: max_area,
            });
        }
        Ok(())
    }
}

fn parse_bound(name: &str, raw: &str) -> DomainResult<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| DomainError::InvalidBounds(format!("{} is not a number: {:?}", name, raw)))?;
    if !value.is_finite() {
        return Err(DomainError::InvalidBounds(format!(
            "{} is not finite: {:?}",
            name, raw
        )));
    }
    Ok(value)
}

/// Validated pagination: page floored at 1, limit clamped into the
/// configured range. Non-numeric input falls back to the defaults,
/// matching the historical endpoint behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn from_raw(page: Option<&str>, limit: Option<&str>, limits: &PageLimits) -> Self {
        let page = page
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = limit
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(limits.default_limit)
            .clamp(limits.min_limit, limits.max_limit);
        Self { page, limit }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Page-size bounds for [`PageRequest::from_raw`].
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub default_limit: u32,
    pub min_limit: u32,
    pub max_limit: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 5000,
            min_limit: 100,
            max_limit: 20000,
        }
    }
}
