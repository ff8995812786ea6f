//! Recorded positions of delivery parties.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{Fixed, ObjectId};

/// Role a party plays in a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Category {
    /// Pickup point gated by a ready time.
    Origin,
    /// Delivery point gated by its required origins.
    Destination,
    /// The travelling agent; the start of every route.
    Agent,
}

impl Category {
    /// Lower-case label used in logs and serialised output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Destination => "destination",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WGS84 latitude and longitude in fixed-point degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinates {
    /// Degrees north, within `[-90, 90]`.
    pub latitude: Fixed,
    /// Degrees east, within `[-180, 180]`.
    pub longitude: Fixed,
}

/// Errors returned by [`Coordinates::new`] and [`Coordinates::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    /// Latitude outside `[-90, 90]`.
    #[error("latitude {latitude} is outside [-90, 90]")]
    LatitudeOutOfRange {
        /// Rejected latitude.
        latitude: Fixed,
    },
    /// Longitude outside `[-180, 180]`.
    #[error("longitude {longitude} is outside [-180, 180]")]
    LongitudeOutOfRange {
        /// Rejected longitude.
        longitude: Fixed,
    },
}

const MAX_LATITUDE: i64 = 9_000;
const MAX_LONGITUDE: i64 = 18_000;

impl Coordinates {
    /// Validate and construct a coordinate pair.
    ///
    /// # Examples
    /// ```
    /// use courier_core::{Coordinates, Fixed};
    ///
    /// assert!(Coordinates::new(Fixed::from_hundredths(4_500), Fixed::ZERO).is_ok());
    /// assert!(Coordinates::new(Fixed::from_hundredths(9_001), Fixed::ZERO).is_err());
    /// ```
    pub const fn new(latitude: Fixed, longitude: Fixed) -> Result<Self, CoordinateError> {
        let coordinates = Self {
            latitude,
            longitude,
        };
        match coordinates.validate() {
            Ok(()) => Ok(coordinates),
            Err(err) => Err(err),
        }
    }

    /// Re-check ranges, typically after deserialisation.
    pub const fn validate(&self) -> Result<(), CoordinateError> {
        if self.latitude.hundredths().unsigned_abs() > MAX_LATITUDE.unsigned_abs() {
            return Err(CoordinateError::LatitudeOutOfRange {
                latitude: self.latitude,
            });
        }
        if self.longitude.hundredths().unsigned_abs() > MAX_LONGITUDE.unsigned_abs() {
            return Err(CoordinateError::LongitudeOutOfRange {
                longitude: self.longitude,
            });
        }
        Ok(())
    }
}

/// One recorded position of a party.
///
/// A party may have many locations over time; planning uses the most recent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Identity of this record.
    pub id: ObjectId,
    /// The party this position belongs to.
    pub object_id: ObjectId,
    /// Role of the party.
    pub category: Category,
    /// When the position was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Where the party was.
    pub coordinates: Coordinates,
}

impl Location {
    /// Record a position now.
    #[must_use]
    pub fn new(object_id: ObjectId, category: Category, coordinates: Coordinates) -> Self {
        Self {
            id: ObjectId::new(),
            object_id,
            category,
            recorded_at: Utc::now(),
            coordinates,
        }
    }

    /// Override the recording time.
    #[must_use]
    pub const fn with_recorded_at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = recorded_at;
        self
    }
}
