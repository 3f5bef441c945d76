//! Text input parsing for hosts without a native location picker

use crate::{LocationError, Result};

/// Types of location input
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// Coordinates (latitude, longitude)
    Coordinates(f64, f64),
    /// Free-text address to be geocoded
    Address(String),
}

/// Location parsing utilities
pub struct LocationParser;

impl LocationParser {
    /// Parse a user's text reply into coordinates or an address query
    pub fn parse(input: &str) -> Result<LocationInput> {
        let input = input.trim();

        if input.is_empty() {
            return Err(LocationError::validation("Location cannot be empty"));
        }

        // Try to parse as coordinates (lat,lon)
        if let Ok((lat, lon)) = Self::parse_coordinates(input) {
            return Ok(LocationInput::Coordinates(lat, lon));
        }

        Ok(LocationInput::Address(input.to_string()))
    }

    /// Parse coordinates from string like "47.6405,-122.1298" or "47.6405 -122.1298"
    fn parse_coordinates(input: &str) -> Result<(f64, f64)> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        let [lat, lon] = parts.as_slice() else {
            return Err(LocationError::validation(
                "Coordinates must be in format 'lat,lon'",
            ));
        };

        let lat = lat
            .parse::<f64>()
            .map_err(|_| LocationError::validation(format!("Invalid latitude: {lat}")))?;
        let lon = lon
            .parse::<f64>()
            .map_err(|_| LocationError::validation(format!("Invalid longitude: {lon}")))?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(LocationError::validation(format!(
                "Latitude must be between -90 and 90, got: {lat}"
            )));
        }

        if !(-180.0..=180.0).contains(&lon) {
            return Err(LocationError::validation(format!(
                "Longitude must be between -180 and 180, got: {lon}"
            )));
        }

        Ok((lat, lon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("47.6405,-122.1298", 47.6405, -122.1298)]
    #[case("47.6405 -122.1298", 47.6405, -122.1298)]
    #[case("  -33.8568, 151.2153 ", -33.8568, 151.2153)]
    fn test_location_parser_coordinates(#[case] input: &str, #[case] lat: f64, #[case] lon: f64) {
        assert_eq!(
            LocationParser::parse(input).unwrap(),
            LocationInput::Coordinates(lat, lon)
        );
    }

    #[rstest]
    #[case("91.0,8.0")]
    #[case("-91.0,8.0")]
    #[case("46.0,181.0")]
    #[case("46.0")]
    #[case("46.0,8.0,0.0")]
    #[case("1 Microsoft Way, Redmond")]
    fn test_location_parser_addresses(#[case] input: &str) {
        assert_eq!(
            LocationParser::parse(input).unwrap(),
            LocationInput::Address(input.to_string())
        );
    }

    #[test]
    fn test_location_parser_rejects_blank() {
        let err = LocationParser::parse("   ").unwrap_err();
        assert!(matches!(err, LocationError::Validation { .. }));
    }
}
