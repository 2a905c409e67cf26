use std::f64::consts::PI;

use crate::error::{check_argument, PanoramaError, Result};
use crate::geo::{azimuth, to_radians_distance, GeoPoint};
use crate::math::{angular_distance, floor_mod, lerp, PI2};
use crate::terrain::TerrainProvider;

/// Arc length between two precomputed profile points, in metres.
pub const PROFILE_SAMPLE_SPACING: f64 = 4096.0;

/// Terrain along the great circle leaving `origin` at `azimuth`, sampled by
/// arc length from the origin.
#[derive(Debug)]
pub struct ElevationProfile<'a, T: ?Sized> {
    terrain: &'a T,
    origin: GeoPoint,
    azimuth: f64,
    length: f64,
    positions: Vec<GeoPoint>,
}

impl<'a, T: TerrainProvider + ?Sized> ElevationProfile<'a, T> {
    pub fn new(terrain: &'a T, origin: GeoPoint, azimuth: f64, length: f64) -> Result<Self> {
        check_argument(azimuth::is_canonical(azimuth), format!("azimuth {azimuth} is not canonical"))?;
        check_argument(length > 0.0 && length.is_finite(), format!("invalid profile length {length}"))?;

        let count = (length / PROFILE_SAMPLE_SPACING).ceil() as usize + 1;
        let alpha = azimuth::to_math(azimuth)?;
        let (sin_lat0, cos_lat0) = origin.latitude().sin_cos();
        let positions = (0..count)
            .map(|i| {
                let delta = to_radians_distance(i as f64 * PROFILE_SAMPLE_SPACING);
                let latitude =
                    (sin_lat0 * delta.cos() + cos_lat0 * delta.sin() * alpha.cos()).clamp(-1.0, 1.0).asin();
                let d_lon = (alpha.sin() * delta.sin() / latitude.cos()).clamp(-1.0, 1.0).asin();
                let longitude = floor_mod(origin.longitude() - d_lon + PI, PI2) - PI;
                GeoPoint::new(longitude, latitude)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { terrain, origin, azimuth, length, positions })
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn position_at(&self, x: f64) -> Result<GeoPoint> {
        self.check_in_range(x)?;
        Ok(self.interpolated_position(x))
    }

    pub fn elevation_at(&self, x: f64) -> Result<f64> {
        self.check_in_range(x)?;
        Ok(self.terrain.elevation_at(self.interpolated_position(x)))
    }

    pub fn slope_at(&self, x: f64) -> Result<f64> {
        self.check_in_range(x)?;
        Ok(self.terrain.slope_at(self.interpolated_position(x)))
    }

    /// Elevation for the root finders, which only probe `[0, length]` up to
    /// rounding; `x` is clamped into range.
    pub(crate) fn elevation_clamped(&self, x: f64) -> f64 {
        self.terrain.elevation_at(self.interpolated_position(x.clamp(0.0, self.length)))
    }

    fn check_in_range(&self, x: f64) -> Result<()> {
        if (0.0..=self.length).contains(&x) {
            Ok(())
        } else {
            Err(PanoramaError::InvalidArgument(format!(
                "profile position {x} outside [0, {}]",
                self.length
            )))
        }
    }

    fn interpolated_position(&self, x: f64) -> GeoPoint {
        let scaled = x / PROFILE_SAMPLE_SPACING;
        let index = (scaled.floor() as usize).min(self.positions.len() - 2);
        let t = scaled - index as f64;
        let (p0, p1) = (self.positions[index], self.positions[index + 1]);
        // Longitudes may wrap across the antimeridian between two points.
        let longitude = p0.longitude() + t * angular_distance(p0.longitude(), p1.longitude());
        GeoPoint::new_unchecked(floor_mod(longitude + PI, PI2) - PI, lerp(p0.latitude(), p1.latitude(), t))
    }
}
