//! Behaviour flags for the location dialog

use bitflags::bitflags;

use crate::models::location::is_blank;
use crate::models::{Address, Location};
use crate::{LocationError, Result};

bitflags! {
    /// Options supplied once when the dialog is constructed
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LocationOptions: u32 {
        /// Let the host use its native location picker when the channel has one
        const USE_NATIVE_CONTROL      = 1 << 0;
        /// Fill the address of a point-only location from the geospatial service
        const REVERSE_GEOCODE         = 1 << 1;
        const SKIP_FAVORITES          = 1 << 2;
        const SKIP_FINAL_CONFIRMATION = 1 << 3;
    }
}

bitflags! {
    /// Address fields that must be present before the dialog completes
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LocationRequiredFields: u32 {
        const STREET_ADDRESS = 1 << 0;
        const LOCALITY       = 1 << 1;
        const REGION         = 1 << 2;
        const POSTAL_CODE    = 1 << 3;
        const COUNTRY        = 1 << 4;
    }
}

impl LocationRequiredFields {
    /// Parse configuration names such as `postal_code` or `Locality`
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        names.iter().try_fold(Self::empty(), |fields, name| {
            let name = name.as_ref().trim();
            Self::from_name(&name.to_uppercase().replace(['-', ' '], "_"))
                .map(|field| fields | field)
                .ok_or_else(|| {
                    LocationError::config(format!("Unknown required field '{name}'"))
                })
        })
    }

    /// Required fields that are absent or blank on `location`
    #[must_use]
    pub fn missing_from(self, location: &Location) -> Self {
        self.iter()
            .filter(|field| is_blank(field.value_in(location.address.as_ref())))
            .fold(Self::empty(), |missing, field| missing | field)
    }

    /// Value of a single field on an address
    #[must_use]
    pub fn value_in(self, address: Option<&Address>) -> Option<&str> {
        let address = address?;
        let value = if self == Self::STREET_ADDRESS {
            &address.address_line
        } else if self == Self::LOCALITY {
            &address.locality
        } else if self == Self::REGION {
            &address.admin_district
        } else if self == Self::POSTAL_CODE {
            &address.postal_code
        } else if self == Self::COUNTRY {
            &address.country_region
        } else {
            return None;
        };
        value.as_deref()
    }

    /// Mutable slot for a single field on an address
    pub(crate) fn slot_in(self, address: &mut Address) -> Option<&mut Option<String>> {
        if self == Self::STREET_ADDRESS {
            Some(&mut address.address_line)
        } else if self == Self::LOCALITY {
            Some(&mut address.locality)
        } else if self == Self::REGION {
            Some(&mut address.admin_district)
        } else if self == Self::POSTAL_CODE {
            Some(&mut address.postal_code)
        } else if self == Self::COUNTRY {
            Some(&mut address.country_region)
        } else {
            None
        }
    }

    /// Name shown to the user when asking for a single field
    #[must_use]
    pub fn label(self) -> &'static str {
        [
            (Self::STREET_ADDRESS, "street address"),
            (Self::LOCALITY, "city or locality"),
            (Self::REGION, "state or region"),
            (Self::POSTAL_CODE, "postal code"),
            (Self::COUNTRY, "country"),
        ]
        .into_iter()
        .find_map(|(field, label)| (field == self).then_some(label))
        .unwrap_or("address details")
    }
}
