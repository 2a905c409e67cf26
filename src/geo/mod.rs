pub mod azimuth;

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{check_argument, Result};
use crate::math::haversin;

/// Mean radius of the spherical Earth model, in metres.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Converts a ground distance in metres to the angle it subtends at the Earth's centre.
pub fn to_radians_distance(meters: f64) -> f64 {
    meters / EARTH_RADIUS
}

pub fn to_meters(radians: f64) -> f64 {
    EARTH_RADIUS * radians
}

/// A point on the Earth's surface, angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    longitude: f64,
    latitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = crate::error::PanoramaError;

    fn try_from(raw: RawGeoPoint) -> Result<Self> {
        GeoPoint::new(raw.longitude, raw.latitude)
    }
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self> {
        check_argument(
            (-PI..=PI).contains(&longitude),
            format!("longitude {longitude} outside [-π, π]"),
        )?;
        check_argument(
            (-FRAC_PI_2..=FRAC_PI_2).contains(&latitude),
            format!("latitude {latitude} outside [-π/2, π/2]"),
        )?;
        Ok(Self { longitude, latitude })
    }

    /// For points derived from valid ones, e.g. by interpolation.
    pub(crate) fn new_unchecked(longitude: f64, latitude: f64) -> Self {
        debug_assert!((-PI..=PI).contains(&longitude) && (-FRAC_PI_2..=FRAC_PI_2).contains(&latitude));
        Self { longitude, latitude }
    }

    pub fn from_degrees(longitude: f64, latitude: f64) -> Result<Self> {
        Self::new(longitude.to_radians(), latitude.to_radians())
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Great-circle distance in metres (haversine formula).
    pub fn distance_to(&self, that: GeoPoint) -> f64 {
        let a = haversin(self.latitude - that.latitude)
            + self.latitude.cos() * that.latitude.cos() * haversin(self.longitude - that.longitude);
        to_meters(2.0 * a.sqrt().asin())
    }

    /// Initial bearing towards `that`, clockwise from north, in `[0, 2π)`.
    pub fn azimuth_to(&self, that: GeoPoint) -> f64 {
        let d_lon = self.longitude - that.longitude;
        let y = d_lon.sin() * that.latitude.cos();
        let x = self.latitude.cos() * that.latitude.sin()
            - self.latitude.sin() * that.latitude.cos() * d_lon.cos();
        azimuth::from_math_unchecked(azimuth::canonicalize(y.atan2(x)))
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3},{:.3}]", self.longitude.to_degrees(), self.latitude.to_degrees())
    }
}
