//! Bing Maps Locations API client
//!
//! Wraps the REST `Locations` endpoints for reverse geocoding by point and
//! forward geocoding by query, with timeout and transient-failure retries.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tracing::{debug, error, info, instrument, warn};

use super::GeoSpatialService;
use crate::config::BingConfig;
use crate::models::{GeoPoint, Location, LocationSet};
use crate::{LocationError, Result};

/// Bing Maps geospatial service
pub struct BingGeoSpatialService {
    client: ClientWithMiddleware,
    base_url: String,
    culture: String,
    max_results: u32,
}

impl BingGeoSpatialService {
    /// Create a new client from configuration
    pub fn new(config: &BingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .user_agent(concat!("bot-location/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LocationError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            culture: config.culture.clone(),
            max_results: config.max_results,
        })
    }

    fn point_url(&self, api_key: &str, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/Locations/{},{}?c={}&key={}",
            self.base_url,
            latitude,
            longitude,
            urlencoding::encode(&self.culture),
            urlencoding::encode(api_key)
        )
    }

    fn query_url(&self, api_key: &str, query: &str) -> String {
        format!(
            "{}/Locations?q={}&c={}&maxResults={}&key={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.culture),
            self.max_results,
            urlencoding::encode(api_key)
        )
    }

    /// Issue the request and decode the first resource set
    async fn fetch(&self, url: &str) -> Result<LocationSet> {
        let start_time = Instant::now();

        let response = self.client.get(url).send().await?;
        let status = response.status();

        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED => {
                    error!("Bing Maps authentication failed (HTTP 401)");
                    LocationError::api("Invalid Bing Maps key. Please check your configuration.")
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    warn!("Bing Maps rate limit exceeded (HTTP 429)");
                    LocationError::api("Bing Maps rate limit exceeded.")
                }
                _ => LocationError::api(format!("Bing Maps error {status}: {body}")),
            });
        }

        let body: wire::LocationsResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Bing Maps response: {}", e);
            LocationError::api(format!("Invalid response received from Bing Maps: {e}"))
        })?;

        Ok(body.into())
    }
}

#[async_trait]
impl GeoSpatialService for BingGeoSpatialService {
    #[instrument(skip(self, api_key))]
    async fn lookup_by_point(
        &self,
        api_key: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationSet> {
        info!("Reverse geocoding {:.4}, {:.4}", latitude, longitude);

        let locations = self
            .fetch(&self.point_url(api_key, latitude, longitude))
            .await?;

        info!("Found {} candidates for point", locations.locations.len());
        Ok(locations)
    }

    #[instrument(skip(self, api_key))]
    async fn lookup_by_query(&self, api_key: &str, query: &str) -> Result<LocationSet> {
        info!("Geocoding address query: '{}'", query);

        let locations = self.fetch(&self.query_url(api_key, query)).await?;

        if locations.is_empty() {
            warn!("No results found for query '{}'", query);
        } else {
            info!(
                "Found {} candidates for '{}'",
                locations.locations.len(),
                query
            );
        }
        Ok(locations)
    }
}

/// Bing Maps REST response structures
mod wire {
    use serde::Deserialize;

    use crate::models::Address;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LocationsResponse {
        #[serde(default)]
        pub resource_sets: Vec<ResourceSet>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResourceSet {
        #[serde(default)]
        pub estimated_total: u32,
        #[serde(default)]
        pub resources: Vec<Resource>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Resource {
        pub name: Option<String>,
        pub point: Option<Point>,
        pub address: Option<Address>,
        pub confidence: Option<String>,
        pub entity_type: Option<String>,
    }

    /// GeoJSON-style point, coordinates are `[latitude, longitude]`
    #[derive(Debug, Deserialize)]
    pub struct Point {
        #[serde(default)]
        pub coordinates: Vec<f64>,
    }
}

impl From<wire::Resource> for Location {
    fn from(resource: wire::Resource) -> Self {
        let point = resource.point.and_then(|point| match point.coordinates[..] {
            [latitude, longitude, ..] => Some(GeoPoint::new(latitude, longitude)),
            _ => None,
        });

        Self {
            name: resource.name,
            entity_type: resource.entity_type,
            confidence: resource.confidence,
            point,
            address: resource.address,
        }
    }
}

impl From<wire::LocationsResponse> for LocationSet {
    fn from(response: wire::LocationsResponse) -> Self {
        response
            .resource_sets
            .into_iter()
            .next()
            .map(|set| LocationSet {
                estimated_total: set.estimated_total,
                locations: set.resources.into_iter().map(Location::from).collect(),
            })
            .unwrap_or_default()
    }
}
