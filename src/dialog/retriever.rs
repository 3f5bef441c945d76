//! Post-processing of a location the user picked
//!
//! The retriever optionally fills a point-only location's address from the
//! geospatial service, then either completes with it or hands it to the
//! required-fields child dialog when address fields are still missing.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::{DialogContext, LocationRequiredFieldsDialog};
use crate::geospatial::GeoSpatialService;
use crate::models::{Location, LocationDialogResponse};
use crate::options::{LocationOptions, LocationRequiredFields};
use crate::parser::{LocationInput, LocationParser};
use crate::{LocationError, Result};

/// Dialog step turning a retrieved location into the final response
pub struct LocationRetrieverDialog {
    api_key: String,
    geospatial_service: Arc<dyn GeoSpatialService>,
    options: LocationOptions,
    required_fields: LocationRequiredFields,
    selected_location: Option<Location>,
    awaiting_child: bool,
}

impl LocationRetrieverDialog {
    pub fn new(
        api_key: impl Into<String>,
        geospatial_service: Arc<dyn GeoSpatialService>,
        options: LocationOptions,
        required_fields: LocationRequiredFields,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LocationError::config("A Bing Maps key is required"));
        }

        Ok(Self {
            api_key,
            geospatial_service,
            options,
            required_fields,
            selected_location: None,
            awaiting_child: false,
        })
    }

    #[must_use]
    pub fn options(&self) -> LocationOptions {
        self.options
    }

    #[must_use]
    pub fn required_fields(&self) -> LocationRequiredFields {
        self.required_fields
    }

    /// Location the step is currently working with, if any
    #[must_use]
    pub fn selected_location(&self) -> Option<&Location> {
        self.selected_location.as_ref()
    }

    /// Enrich the picked location and complete, or delegate to the required-fields dialog
    #[instrument(skip_all)]
    pub async fn process_retrieved_location<C>(
        &mut self,
        context: &mut C,
        mut location: Location,
    ) -> Result<()>
    where
        C: DialogContext + ?Sized,
    {
        self.awaiting_child = false;
        self.try_reverse_geocode_address(&mut location).await;

        let missing = self.required_fields.missing_from(&location);
        self.selected_location = Some(location.clone());

        if missing.is_empty() {
            debug!("All required fields present, completing");
            context.done(LocationDialogResponse::new(location)).await
        } else {
            debug!("Missing required fields {:?}, delegating", missing);
            self.awaiting_child = true;
            context
                .call(LocationRequiredFieldsDialog::new(location, self.required_fields))
                .await
        }
    }

    /// Complete with the location the required-fields dialog returned
    pub async fn resume_after_child_dialog<C>(
        &mut self,
        context: &mut C,
        response: LocationDialogResponse,
    ) -> Result<()>
    where
        C: DialogContext + ?Sized,
    {
        if !self.awaiting_child {
            warn!("Resume without a delegated required-fields dialog");
            return Err(LocationError::dialog(
                "No required-fields dialog was started for this location",
            ));
        }
        self.awaiting_child = false;

        // the user may have edited the location in the child dialog
        self.selected_location = Some(response.location.clone());
        context.done(response).await
    }

    /// Resolve a typed reply (coordinates or address) and process it
    pub async fn retrieve_from_text<C>(&mut self, context: &mut C, text: &str) -> Result<()>
    where
        C: DialogContext + ?Sized,
    {
        let location = match LocationParser::parse(text)? {
            LocationInput::Coordinates(lat, lon) => Location::from_point(lat, lon),
            LocationInput::Address(query) => {
                let results = self
                    .geospatial_service
                    .lookup_by_query(&self.api_key, &query)
                    .await?;
                results
                    .locations
                    .into_iter()
                    .next()
                    .ok_or_else(|| LocationError::api(format!("Location not found: {query}")))?
            }
        };

        self.process_retrieved_location(context, location).await
    }

    /// Fill a point-only location's address from the reverse geocoder.
    ///
    /// Best effort: lookup failures and empty results leave the location as is.
    async fn try_reverse_geocode_address(&self, location: &mut Location) {
        if !self.options.contains(LocationOptions::REVERSE_GEOCODE) || location.has_address() {
            return;
        }
        let Some(point) = location.point else {
            return;
        };

        match self
            .geospatial_service
            .lookup_by_point(&self.api_key, point.latitude, point.longitude)
            .await
        {
            Ok(results) => match results.first_region_address() {
                Some(address) => {
                    info!("Reverse geocoded {}", point.format_coordinates());
                    location.address = Some(address);
                }
                None => debug!("No address found for {}", point.format_coordinates()),
            },
            Err(e) => warn!(
                "Reverse geocoding {} failed, keeping location: {}",
                point.format_coordinates(),
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, LocationSet};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeGeoSpatialService {
        query_results: LocationSet,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GeoSpatialService for FakeGeoSpatialService {
        async fn lookup_by_point(&self, _: &str, _: f64, _: f64) -> Result<LocationSet> {
            Err(LocationError::api("offline"))
        }

        async fn lookup_by_query(&self, api_key: &str, query: &str) -> Result<LocationSet> {
            assert_eq!(api_key, "test-key");
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.query_results.clone())
        }
    }

    #[derive(Default)]
    struct DoneContext {
        done: Vec<LocationDialogResponse>,
    }

    #[async_trait]
    impl DialogContext for DoneContext {
        async fn call(&mut self, _: LocationRequiredFieldsDialog) -> Result<()> {
            Err(LocationError::dialog("unexpected child dialog"))
        }

        async fn done(&mut self, response: LocationDialogResponse) -> Result<()> {
            self.done.push(response);
            Ok(())
        }
    }

    fn dialog(service: Arc<FakeGeoSpatialService>) -> LocationRetrieverDialog {
        LocationRetrieverDialog::new(
            "test-key",
            service,
            LocationOptions::REVERSE_GEOCODE,
            LocationRequiredFields::empty(),
        )
        .unwrap()
    }

    #[test]
    fn test_blank_api_key_rejected() {
        let result = LocationRetrieverDialog::new(
            " ",
            Arc::new(FakeGeoSpatialService::default()),
            LocationOptions::empty(),
            LocationRequiredFields::empty(),
        );
        assert!(matches!(result, Err(LocationError::Config { .. })));
    }

    #[tokio::test]
    async fn test_geocoding_failure_is_swallowed() {
        let mut dialog = dialog(Arc::new(FakeGeoSpatialService::default()));
        let mut context = DoneContext::default();

        dialog
            .process_retrieved_location(&mut context, Location::from_point(46.95, 7.45))
            .await
            .unwrap();

        assert_eq!(
            context.done,
            vec![LocationDialogResponse::new(Location::from_point(46.95, 7.45))]
        );
        assert_eq!(dialog.selected_location(), Some(&Location::from_point(46.95, 7.45)));
    }

    #[tokio::test]
    async fn test_text_coordinates_skip_forward_geocoding() {
        let service = Arc::new(FakeGeoSpatialService::default());
        let mut dialog = dialog(service.clone());
        let mut context = DoneContext::default();

        dialog
            .retrieve_from_text(&mut context, "46.95, 7.45")
            .await
            .unwrap();

        assert!(service.queries.lock().unwrap().is_empty());
        assert_eq!(context.done[0].location.point.map(|p| p.latitude), Some(46.95));
    }

    #[tokio::test]
    async fn test_text_address_uses_first_candidate() {
        let found = Location::from_address(Address {
            locality: Some("Bern".to_string()),
            country_region: Some("Switzerland".to_string()),
            ..Address::default()
        });
        let service = Arc::new(FakeGeoSpatialService {
            query_results: LocationSet {
                estimated_total: 1,
                locations: vec![found.clone()],
            },
            ..FakeGeoSpatialService::default()
        });
        let mut dialog = dialog(service.clone());
        let mut context = DoneContext::default();

        dialog
            .retrieve_from_text(&mut context, "Bundesplatz Bern")
            .await
            .unwrap();

        assert_eq!(*service.queries.lock().unwrap(), vec!["Bundesplatz Bern"]);
        assert_eq!(context.done, vec![LocationDialogResponse::new(found)]);
    }

    #[tokio::test]
    async fn test_text_address_without_results() {
        let mut dialog = dialog(Arc::new(FakeGeoSpatialService::default()));
        let mut context = DoneContext::default();

        let err = dialog
            .retrieve_from_text(&mut context, "Atlantis")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Location not found: Atlantis"));
        assert!(context.done.is_empty());
    }

    #[tokio::test]
    async fn test_resume_without_delegation_is_rejected() {
        let mut dialog = dialog(Arc::new(FakeGeoSpatialService::default()));
        let mut context = DoneContext::default();

        let err = dialog
            .resume_after_child_dialog(
                &mut context,
                LocationDialogResponse::new(Location::from_point(46.95, 7.45)),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, LocationError::Dialog { .. }));
        assert!(context.done.is_empty());
        assert!(dialog.selected_location().is_none());
    }
}
