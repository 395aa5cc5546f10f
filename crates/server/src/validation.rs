//! Request payload validation with field-level errors.
//!
//! Handlers validate every field of a payload before acting, collecting all
//! failures rather than stopping at the first, so a client can fix a whole
//! form in one round trip. The collected errors surface as a 400 response
//! with an `errors` array via [`crate::error::AppError::Validation`].

use serde::Serialize;

/// A single validation failure, tied to the offending field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    /// Request field name, as the client sent it (camelCase).
    pub field: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulates field errors across a payload.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    /// Create an empty validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for a field.
    pub fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Record a parse result against a field, keeping the value on success.
    pub fn check<T, E: std::fmt::Display>(
        &mut self,
        field: &str,
        result: Result<T, E>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.fail(field, e.to_string());
                None
            }
        }
    }

    /// Record a failure if a required value is absent, otherwise keep it.
    pub fn require<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.fail(field, format!("{field} is required"));
        }
        value
    }

    /// Finish, returning the collected errors if any field failed.
    ///
    /// # Errors
    ///
    /// Returns every recorded [`FieldError`] when at least one exists.
    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use parceltrack_core::{ParcelStatus, TrackingNumber};

    #[test]
    fn test_all_failures_are_collected() {
        let mut v = Validator::new();
        let tn = v.check("trackingNumber", TrackingNumber::parse("x!"));
        let status = v.check("status", "teleported".parse::<ParcelStatus>());
        assert!(tn.is_none());
        assert!(status.is_none());

        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "trackingNumber");
        assert_eq!(errors[1].field, "status");
    }

    #[test]
    fn test_valid_payload_passes() {
        let mut v = Validator::new();
        let tn = v.check("trackingNumber", TrackingNumber::parse("TRK0012345"));
        assert!(tn.is_some());
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_require_flags_missing_values() {
        let mut v = Validator::new();
        assert!(v.require::<&str>("location", None).is_none());
        assert_eq!(v.require("status", Some("delivered")), Some("delivered"));

        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "location");
    }
}
