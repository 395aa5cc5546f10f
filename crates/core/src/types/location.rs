//! Geographic location value.

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Location`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum LocationError {
    /// The description is empty or whitespace.
    #[error("location description cannot be empty")]
    EmptyDescription,
    /// Latitude outside [-90, 90].
    #[error("latitude must be between -90 and 90")]
    LatitudeOutOfRange,
    /// Longitude outside [-180, 180].
    #[error("longitude must be between -180 and 180")]
    LongitudeOutOfRange,
}

/// An immutable geocoordinate with a descriptive label.
///
/// Constructed through [`Location::new`], which enforces coordinate ranges
/// and a non-empty description; the fields are never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    description: String,
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Create a validated location.
    ///
    /// # Errors
    ///
    /// Returns an error if the description is blank, latitude is outside
    /// [-90, 90], or longitude is outside [-180, 180].
    pub fn new(
        description: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, LocationError> {
        let description = description.into().trim().to_owned();

        if description.is_empty() {
            return Err(LocationError::EmptyDescription);
        }

        // Range checks also reject NaN, which compares false to everything.
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(LocationError::LatitudeOutOfRange);
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::LongitudeOutOfRange);
        }

        Ok(Self {
            description,
            latitude,
            longitude,
        })
    }

    /// Human-readable place label.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Latitude in degrees, within [-90, 90].
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees, within [-180, 180].
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let loc = Location::new("Oslo, Norway", 59.9139, 10.7522).unwrap();
        assert_eq!(loc.description(), "Oslo, Norway");
        assert!((loc.latitude() - 59.9139).abs() < f64::EPSILON);
        assert!((loc.longitude() - 10.7522).abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_trims_description() {
        let loc = Location::new("  Berlin  ", 52.52, 13.405).unwrap();
        assert_eq!(loc.description(), "Berlin");
    }

    #[test]
    fn test_new_rejects_blank_description() {
        assert!(matches!(
            Location::new("   ", 0.0, 0.0),
            Err(LocationError::EmptyDescription)
        ));
    }

    #[test]
    fn test_new_rejects_bad_latitude() {
        assert!(matches!(
            Location::new("Nowhere", 90.1, 0.0),
            Err(LocationError::LatitudeOutOfRange)
        ));
        assert!(matches!(
            Location::new("Nowhere", -90.1, 0.0),
            Err(LocationError::LatitudeOutOfRange)
        ));
        assert!(matches!(
            Location::new("Nowhere", f64::NAN, 0.0),
            Err(LocationError::LatitudeOutOfRange)
        ));
    }

    #[test]
    fn test_new_rejects_bad_longitude() {
        assert!(matches!(
            Location::new("Nowhere", 0.0, 180.5),
            Err(LocationError::LongitudeOutOfRange)
        ));
        assert!(matches!(
            Location::new("Nowhere", 0.0, -180.5),
            Err(LocationError::LongitudeOutOfRange)
        ));
    }

    #[test]
    fn test_boundary_values_accepted() {
        assert!(Location::new("North Pole", 90.0, 0.0).is_ok());
        assert!(Location::new("South Pole", -90.0, 0.0).is_ok());
        assert!(Location::new("Antimeridian", 0.0, 180.0).is_ok());
        assert!(Location::new("Antimeridian", 0.0, -180.0).is_ok());
    }

    #[test]
    fn test_serde_shape() {
        let loc = Location::new("Oslo", 59.9, 10.75).unwrap();
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(json["description"], "Oslo");
        let back: Location = serde_json::from_value(json).unwrap();
        assert_eq!(back, loc);
    }
}
