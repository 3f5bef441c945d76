//! Geospatial lookups used to resolve and enrich picked locations

use async_trait::async_trait;

use crate::Result;
use crate::models::LocationSet;

pub mod bing;

pub use bing::BingGeoSpatialService;

/// Forward and reverse geocoding against an external service
#[async_trait]
pub trait GeoSpatialService: Send + Sync {
    /// Candidate locations at a coordinate, best match first
    async fn lookup_by_point(&self, api_key: &str, latitude: f64, longitude: f64)
    -> Result<LocationSet>;

    /// Candidate locations matching a free-text address
    async fn lookup_by_query(&self, api_key: &str, query: &str) -> Result<LocationSet>;
}
