//! Great-circle helpers and the interpolated local frame.
//!
//! Conventions
//! - Spherical earth of radius `EARTH_RADIUS_M`.
//! - Latitudes/longitudes and bearings in degrees; bearings clockwise from north.
//! - Distances in metres. Negative distances travel against the bearing.

mod frame;


pub use frame::{Interp3, LocalFrame};

/// Mean earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6371e3;

/// Geodetic position in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Point reached after travelling `distance` metres along the great circle at `bearing`.
    pub fn destination(&self, distance: f64, bearing: f64) -> GeoPoint {
        let lat1 = self.lat.to_radians();
        let lon1 = self.lon.to_radians();
        let theta = bearing.to_radians();
        let delta = distance / EARTH_RADIUS_M;
        let (sin_lat1, cos_lat1) = lat1.sin_cos();
        let (sin_d, cos_d) = delta.sin_cos();
        let sin_lat2 = (sin_lat1 * cos_d + cos_lat1 * sin_d * theta.cos()).clamp(-1.0, 1.0);
        let lat2 = sin_lat2.asin();
        let lon2 = lon1 + (theta.sin() * sin_d * cos_lat1).atan2(cos_d - sin_lat1 * sin_lat2);
        GeoPoint::new(lat2.to_degrees(), lon2.to_degrees())
    }

    /// Haversine distance in metres and initial bearing in degrees (range (-180, 180]).
    pub fn distance_bearing(&self, other: &GeoPoint) -> (f64, f64) {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
        let y = dlon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
        (EARTH_RADIUS_M * c, y.atan2(x).to_degrees())
    }
}
