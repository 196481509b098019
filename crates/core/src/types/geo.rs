//! Geographic point type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`GeoPoint`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// A coordinate is NaN or infinite.
    #[error("coordinate is not a finite number")]
    NotFinite,
    /// Latitude is outside [-90, 90].
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Longitude is outside [-180, 180].
    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A WGS 84 (SRID 4326) geographic point.
///
/// Construction validates coordinate ranges, so a `GeoPoint` held anywhere in
/// the system is known to be a real position. Validation happens once at the
/// write/request boundary; read paths never re-check.
///
/// ## Examples
///
/// ```
/// use shopdex_core::GeoPoint;
///
/// // Central Bangkok
/// let p = GeoPoint::new(13.7563, 100.5018).unwrap();
/// assert_eq!(p.latitude(), 13.7563);
///
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// assert!(GeoPoint::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

/// Mean Earth radius in kilometers, per the IUGG.
const EARTH_RADIUS_KM: f64 = 6371.0;

impl GeoPoint {
    /// Create a point from latitude and longitude in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if either coordinate is non-finite or out of
    /// range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(GeoError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another point, in kilometers (Haversine).
    ///
    /// The store computes distances with PostGIS; this helper exists for the
    /// in-memory paths and for asserting the store's results in tests. The
    /// two agree to well under 1% at directory-search distances.
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlng = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        assert!(GeoPoint::new(13.7563, 100.5018).is_ok());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
        assert!(GeoPoint::new(90.0, -180.0).is_ok());
        assert!(GeoPoint::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_new_out_of_range() {
        assert_eq!(
            GeoPoint::new(90.1, 0.0),
            Err(GeoError::LatitudeOutOfRange(90.1))
        );
        assert_eq!(
            GeoPoint::new(0.0, -180.5),
            Err(GeoError::LongitudeOutOfRange(-180.5))
        );
    }

    #[test]
    fn test_new_not_finite() {
        assert_eq!(GeoPoint::new(f64::NAN, 0.0), Err(GeoError::NotFinite));
        assert_eq!(GeoPoint::new(0.0, f64::INFINITY), Err(GeoError::NotFinite));
    }

    #[test]
    fn test_distance_zero() {
        let p = GeoPoint::new(13.7563, 100.5018).expect("valid point");
        assert!(p.distance_km(&p) < 1e-9);
    }

    #[test]
    fn test_distance_central_bangkok() {
        // Siam to Chatuchak-ish: about 3.1 km of straight-line distance.
        let center = GeoPoint::new(13.7563, 100.5018).expect("valid point");
        let near = GeoPoint::new(13.7763, 100.5218).expect("valid point");
        let d = center.distance_km(&near);
        assert!(
            (2.9..=3.3).contains(&d),
            "expected ~3.1 km, got {d}"
        );
        // Symmetric.
        assert!((d - near.distance_km(&center)).abs() < 1e-9);
    }

    #[test]
    fn test_distance_excludes_far_shop() {
        // A point ~50 km away must fall outside a 5 km radius.
        let center = GeoPoint::new(13.7563, 100.5018).expect("valid point");
        let far = GeoPoint::new(14.2059, 100.5018).expect("valid point");
        let d = center.distance_km(&far);
        assert!((48.0..=52.0).contains(&d), "expected ~50 km, got {d}");
        assert!(d > 5.0);
    }

    #[test]
    fn test_distance_known_pair() {
        // Bangkok to Chiang Mai, roughly 580 km.
        let bkk = GeoPoint::new(13.7563, 100.5018).expect("valid point");
        let cnx = GeoPoint::new(18.7883, 98.9853).expect("valid point");
        let d = bkk.distance_km(&cnx);
        assert!((570.0..=600.0).contains(&d), "got {d}");
    }
}
