//! Results exchanged with the geospatial service and the calling dialog

use serde::{Deserialize, Serialize};

use super::{Address, Location};

/// Candidate locations returned by a geospatial lookup
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationSet {
    /// Total number of matches the service reported
    pub estimated_total: u32,
    /// Candidates, best match first
    pub locations: Vec<Location>,
}

impl LocationSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Region-level address of the first candidate that still has one after
    /// street-level fields are dropped
    #[must_use]
    pub fn first_region_address(&self) -> Option<Address> {
        self.locations
            .iter()
            .filter_map(|location| location.address.as_ref())
            .map(Address::region_level)
            .find(|address| !address.is_empty())
    }
}

/// Final result handed back to the calling conversation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationDialogResponse {
    pub location: Location,
}

impl LocationDialogResponse {
    #[must_use]
    pub fn new(location: Location) -> Self {
        Self { location }
    }

    #[must_use]
    pub fn into_location(self) -> Location {
        self.location
    }
}
