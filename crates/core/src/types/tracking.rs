//! Tracking number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TrackingNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum TrackingNumberError {
    /// The input is shorter than the minimum length.
    #[error("tracking number must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input is longer than the maximum length.
    #[error("tracking number cannot exceed {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside A-Z and 0-9.
    #[error("tracking number must contain only letters and digits")]
    InvalidCharacter,
}

/// A parcel tracking number.
///
/// The caller-visible unique identifier for a parcel. Input is normalized to
/// uppercase on parse, so `trk0012345` and `TRK0012345` refer to the same
/// parcel.
///
/// ## Constraints
///
/// - Length: 5-20 characters
/// - ASCII letters and digits only
///
/// ## Examples
///
/// ```
/// use parceltrack_core::TrackingNumber;
///
/// let tn = TrackingNumber::parse("trk0012345").unwrap();
/// assert_eq!(tn.as_str(), "TRK0012345");
/// assert_eq!(tn.formatted(), "TRK0-0123-45");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Minimum length of a tracking number.
    pub const MIN_LENGTH: usize = 5;
    /// Maximum length of a tracking number.
    pub const MAX_LENGTH: usize = 20;

    /// Parse a `TrackingNumber` from a string, normalizing to uppercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is shorter than 5 characters, longer
    /// than 20 characters, or contains anything other than ASCII letters
    /// and digits.
    pub fn parse(s: &str) -> Result<Self, TrackingNumberError> {
        let s = s.trim();

        if s.len() < Self::MIN_LENGTH {
            return Err(TrackingNumberError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(TrackingNumberError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TrackingNumberError::InvalidCharacter);
        }

        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Returns the tracking number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `TrackingNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Cosmetic display form: 4-character blocks joined by `-`.
    ///
    /// A trailing partial block keeps its characters without a trailing
    /// separator, e.g. `TRK0012345` becomes `TRK0-0123-45`.
    #[must_use]
    pub fn formatted(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        chars
            .chunks(4)
            .map(|chunk| chunk.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TrackingNumber {
    type Err = TrackingNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TrackingNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for TrackingNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for TrackingNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for TrackingNumber {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
