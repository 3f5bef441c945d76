//! Location retrieval dialog step for bot conversations
//!
//! Takes a location the user picked, optionally reverse geocodes its
//! coordinate into a postal address, and makes sure the required address
//! fields are present before handing the result back to the conversation.

pub mod config;
pub mod dialog;
pub mod error;
pub mod geospatial;
pub mod logging;
pub mod models;
pub mod options;
pub mod parser;

// Re-export core types for public API
pub use config::LocationDialogConfig;
pub use dialog::{DialogContext, LocationRequiredFieldsDialog, LocationRetrieverDialog};
pub use error::LocationError;
pub use geospatial::{BingGeoSpatialService, GeoSpatialService};
pub use models::{Address, GeoPoint, Location, LocationDialogResponse, LocationSet};
pub use options::{LocationOptions, LocationRequiredFields};
pub use parser::{LocationInput, LocationParser};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, LocationError>;
