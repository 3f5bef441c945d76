//! Location model for picked points and structured postal addresses

use serde::{Deserialize, Serialize};

/// Geographic coordinate pair
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format point as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Structured postal address
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street line, e.g. "1 Microsoft Way"
    pub address_line: Option<String>,
    /// City or town
    pub locality: Option<String>,
    /// State or province
    pub admin_district: Option<String>,
    /// County or second-level subdivision
    pub admin_district2: Option<String>,
    pub postal_code: Option<String>,
    pub country_region: Option<String>,
    /// Full address as rendered by the geospatial service
    pub formatted_address: Option<String>,
}

impl Address {
    /// True when no field carries a non-blank value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.address_line,
            &self.locality,
            &self.admin_district,
            &self.admin_district2,
            &self.postal_code,
            &self.country_region,
            &self.formatted_address,
        ]
        .into_iter()
        .all(|field| is_blank(field.as_deref()))
    }

    /// Copy of the address keeping only the region-level fields.
    ///
    /// Street line and formatted address are dropped: a reverse geocoder is not
    /// accurate enough at street level for them to be kept.
    #[must_use]
    pub fn region_level(&self) -> Self {
        Self {
            address_line: None,
            locality: self.locality.clone(),
            admin_district: self.admin_district.clone(),
            admin_district2: self.admin_district2.clone(),
            postal_code: self.postal_code.clone(),
            country_region: self.country_region.clone(),
            formatted_address: None,
        }
    }

    /// Join the populated components with `separator`
    #[must_use]
    pub fn formatted(&self, separator: &str) -> String {
        [
            &self.address_line,
            &self.locality,
            &self.admin_district,
            &self.postal_code,
            &self.country_region,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
    }
}

/// A location picked by the user, possibly enriched by geocoding
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Display name
    pub name: Option<String>,
    /// Entity type reported by the geospatial service (Address, PopulatedPlace, ...)
    pub entity_type: Option<String>,
    /// Match confidence reported by the geospatial service
    pub confidence: Option<String>,
    pub point: Option<GeoPoint>,
    pub address: Option<Address>,
}

impl Location {
    /// Create a location holding only a coordinate
    #[must_use]
    pub fn from_point(latitude: f64, longitude: f64) -> Self {
        Self {
            point: Some(GeoPoint::new(latitude, longitude)),
            ..Self::default()
        }
    }

    /// Create a location holding only an address
    #[must_use]
    pub fn from_address(address: Address) -> Self {
        Self {
            address: Some(address),
            ..Self::default()
        }
    }

    /// True when the address is present and not empty
    #[must_use]
    pub fn has_address(&self) -> bool {
        self.address.as_ref().is_some_and(|address| !address.is_empty())
    }

    /// Human readable label: formatted address, name, or coordinates
    #[must_use]
    pub fn display_label(&self) -> String {
        if let Some(address) = &self.address {
            if let Some(formatted) = address
                .formatted_address
                .as_deref()
                .filter(|value| !value.trim().is_empty())
            {
                return formatted.to_string();
            }
            let joined = address.formatted(", ");
            if !joined.is_empty() {
                return joined;
            }
        }
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.point
            .map(|point| point.format_coordinates())
            .unwrap_or_default()
    }
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|value| value.trim().is_empty())
}
