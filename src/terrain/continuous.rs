use crate::geo::{to_meters, GeoPoint};
use crate::math::{bilerp, sq};
use crate::terrain::{sample_index, DiscreteElevationModel, TerrainProvider, SAMPLES_PER_RADIAN};

/// Bilinear reconstruction of a [`DiscreteElevationModel`]. Samples outside the
/// model's extent read as sea level.
#[derive(Debug, Clone, Copy)]
pub struct ContinuousElevationModel<'a> {
    dem: &'a DiscreteElevationModel,
}

impl<'a> ContinuousElevationModel<'a> {
    pub fn new(dem: &'a DiscreteElevationModel) -> Self {
        Self { dem }
    }

    pub fn dem(&self) -> &'a DiscreteElevationModel {
        self.dem
    }

    /// Ground distance between two neighbouring samples, in metres.
    pub fn sample_spacing() -> f64 {
        to_meters(1.0 / SAMPLES_PER_RADIAN)
    }

    pub fn elevation_at(&self, p: GeoPoint) -> f64 {
        self.interpolate(p, |x, y| self.elevation_at_index(x, y))
    }

    pub fn slope_at(&self, p: GeoPoint) -> f64 {
        self.interpolate(p, |x, y| self.slope_at_index(x, y))
    }

    fn interpolate(&self, p: GeoPoint, at: impl Fn(i32, i32) -> f64) -> f64 {
        let xp = sample_index(p.longitude());
        let yp = sample_index(p.latitude());
        let x = xp.floor();
        let y = yp.floor();
        let (xi, yi) = (x as i32, y as i32);
        bilerp(at(xi, yi), at(xi + 1, yi), at(xi, yi + 1), at(xi + 1, yi + 1), xp - x, yp - y)
    }

    fn elevation_at_index(&self, x: i32, y: i32) -> f64 {
        self.dem.elevation_sample(x, y).unwrap_or(0.0)
    }

    fn slope_at_index(&self, x: i32, y: i32) -> f64 {
        let d = Self::sample_spacing();
        let z = self.elevation_at_index(x, y);
        let east = z - self.elevation_at_index(x + 1, y);
        let north = z - self.elevation_at_index(x, y + 1);
        (d / (sq(east) + sq(north) + sq(d)).sqrt()).acos()
    }
}

impl TerrainProvider for ContinuousElevationModel<'_> {
    fn elevation_at(&self, p: GeoPoint) -> f64 {
        ContinuousElevationModel::elevation_at(self, p)
    }

    fn slope_at(&self, p: GeoPoint) -> f64 {
        ContinuousElevationModel::slope_at(self, p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::{Interval1D, Interval2D};
    use crate::terrain::Tile;

    /// 3×3 samples at arc-seconds [0..2]×[0..2], north row first.
    fn small_dem(samples: Vec<i16>) -> DiscreteElevationModel {
        let extent = Interval2D::new(Interval1D::new(0, 2).unwrap(), Interval1D::new(0, 2).unwrap());
        Tile::from_samples(extent, samples).unwrap().into()
    }

    fn at_index(x: f64, y: f64) -> GeoPoint {
        GeoPoint::new(x / SAMPLES_PER_RADIAN, y / SAMPLES_PER_RADIAN).unwrap()
    }

    #[test]
    fn grid_corner_returns_raw_sample() {
        let dem = small_dem(vec![10, 20, 30, 40, 50, 60, 70, 80, 90]);
        let cem = ContinuousElevationModel::new(&dem);
        // (1, 1) is the centre sample, (0, 2) the north-west corner.
        assert!((cem.elevation_at(at_index(1.0, 1.0)) - 50.0).abs() < 1e-6);
        assert!((cem.elevation_at(at_index(0.0, 2.0)) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn interpolates_between_samples() {
        let dem = small_dem(vec![0, 0, 0, 0, 0, 0, 100, 200, 0]);
        let cem = ContinuousElevationModel::new(&dem);
        // Halfway between (0, 0) = 100 and (1, 0) = 200.
        assert!((cem.elevation_at(at_index(0.5, 0.0)) - 150.0).abs() < 1e-6);
    }

    #[test]
    fn outside_extent_is_sea_level() {
        let dem = small_dem(vec![100; 9]);
        let cem = ContinuousElevationModel::new(&dem);
        assert_eq!(cem.elevation_at(at_index(10.0, 10.0)), 0.0);
        // Halfway between the east border and the first missing column.
        assert!((cem.elevation_at(at_index(2.5, 1.0)) - 50.0).abs() < 1e-6);
    }

    #[test]
    fn flat_ground_has_zero_slope() {
        let dem = small_dem(vec![100; 9]);
        let cem = ContinuousElevationModel::new(&dem);
        assert!(cem.slope_at(at_index(0.5, 0.5)).abs() < 1e-9);
    }

    #[test]
    fn slope_follows_elevation_difference() {
        let d = ContinuousElevationModel::sample_spacing();
        let step = d.round() as i16;
        // Rises by `step` per sample towards the west.
        let dem = small_dem(vec![2 * step, step, 0, 2 * step, step, 0, 2 * step, step, 0]);
        let cem = ContinuousElevationModel::new(&dem);
        let expected = (d / (f64::from(step).powi(2) + d * d).sqrt()).acos();
        assert!((cem.slope_at(at_index(0.0, 0.0)) - expected).abs() < 1e-9);
    }
}
