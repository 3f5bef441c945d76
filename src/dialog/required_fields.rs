//! Child dialog collecting address fields the picked location is missing

use tracing::debug;

use crate::models::{Location, LocationDialogResponse};
use crate::options::LocationRequiredFields;
use crate::{LocationError, Result};

/// Turn-by-turn collection of missing required address fields.
///
/// The host asks [`prompt`](Self::prompt) for each pending field and feeds the
/// user's reply to [`submit`](Self::submit) until the dialog is complete.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRequiredFieldsDialog {
    location: Location,
    required: LocationRequiredFields,
    pending: LocationRequiredFields,
}

impl LocationRequiredFieldsDialog {
    #[must_use]
    pub fn new(location: Location, required: LocationRequiredFields) -> Self {
        let pending = required.missing_from(&location);
        Self {
            location,
            required,
            pending,
        }
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub fn required(&self) -> LocationRequiredFields {
        self.required
    }

    /// Fields still waiting for an answer
    #[must_use]
    pub fn pending(&self) -> LocationRequiredFields {
        self.pending
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Next field to ask for, in street, locality, region, postal code, country order
    #[must_use]
    pub fn next_field(&self) -> Option<LocationRequiredFields> {
        self.pending.iter().next()
    }

    /// Question for the next pending field
    #[must_use]
    pub fn prompt(&self) -> Option<String> {
        self.next_field()
            .map(|field| format!("Please provide the {}.", field.label()))
    }

    /// Store the user's answer for the next pending field
    pub fn submit(&mut self, value: &str) -> Result<()> {
        let field = self
            .next_field()
            .ok_or_else(|| LocationError::dialog("All required fields are already provided"))?;

        let value = value.trim();
        if value.is_empty() {
            return Err(LocationError::validation(format!(
                "The {} cannot be empty",
                field.label()
            )));
        }

        let address = self.location.address.get_or_insert_with(Default::default);
        if let Some(slot) = field.slot_in(address) {
            *slot = Some(value.to_string());
        }
        self.pending.remove(field);

        debug!("Collected {}, {} fields pending", field.label(), self.pending.iter().count());
        Ok(())
    }

    /// Final response once every required field is present
    pub fn into_response(self) -> Result<LocationDialogResponse> {
        if let Some(field) = self.next_field() {
            return Err(LocationError::dialog(format!(
                "Required field '{}' is still missing",
                field.label()
            )));
        }
        Ok(LocationDialogResponse::new(self.location))
    }
}
