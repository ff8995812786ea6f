//! Distance metrics between geographic nodes.
//!
//! Metrics are selected through [`DistanceStrategy`] so callers name a
//! strategy rather than a concrete type. New metrics only add a variant and
//! an implementation of [`DistanceCalculator`].

use crate::{Coordinates, Fixed, FixedError, GeoNode};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Computes the distance between two nodes.
///
/// Implementations must be symmetric and return zero for identical
/// coordinates.
pub trait DistanceCalculator: Send + Sync {
    /// Distance from `from` to `to`, rounded to two fractional digits.
    fn distance(&self, from: &GeoNode, to: &GeoNode) -> Result<Fixed, FixedError>;
}

/// Great-circle distance on a spherical Earth.
///
/// # Examples
/// ```
/// use courier_core::{Coordinates, Fixed, HaversineDistance};
///
/// let a = Coordinates::new(Fixed::ZERO, Fixed::ZERO)?;
/// let b = Coordinates::new(Fixed::ZERO, Fixed::from_int(1)?)?;
/// assert_eq!(HaversineDistance::between(&a, &b)?.to_string(), "111.19");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct HaversineDistance;

impl HaversineDistance {
    /// Kilometres between two coordinate pairs.
    ///
    /// Latitude and longitude differences are taken as absolute values and
    /// the cosine product is commutative, so swapping the arguments yields a
    /// bit-identical result.
    #[expect(
        clippy::float_arithmetic,
        reason = "trigonometry is inherently floating point; the result is quantised"
    )]
    pub fn between(from: &Coordinates, to: &Coordinates) -> Result<Fixed, FixedError> {
        let from_lat = from.latitude.to_f64();
        let to_lat = to.latitude.to_f64();
        let d_lat = (to_lat - from_lat).abs().to_radians();
        let d_lon = (to.longitude.to_f64() - from.longitude.to_f64())
            .abs()
            .to_radians();
        let cos_product = from_lat.to_radians().cos() * to_lat.to_radians().cos();

        let a = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * cos_product;
        let central_angle = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();
        Fixed::from_f64(EARTH_RADIUS_KM * central_angle)
    }
}

impl DistanceCalculator for HaversineDistance {
    fn distance(&self, from: &GeoNode, to: &GeoNode) -> Result<Fixed, FixedError> {
        Self::between(&from.coordinates, &to.coordinates)
    }
}

/// Identifier for a distance metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum DistanceStrategy {
    /// [`HaversineDistance`].
    #[default]
    Haversine,
}

impl DistanceStrategy {
    /// Resolve the strategy to its calculator.
    #[must_use]
    pub const fn calculator(self) -> &'static dyn DistanceCalculator {
        match self {
            Self::Haversine => &HaversineDistance,
        }
    }
}
