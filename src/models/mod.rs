//! Data models for the location dialog
//!
//! - Location: picked point, structured address and service metadata
//! - Response: geospatial lookup results and the final dialog response

pub mod location;
pub mod response;

// Re-export all public types for convenient access
pub use location::{Address, GeoPoint, Location};
pub use response::{LocationDialogResponse, LocationSet};
