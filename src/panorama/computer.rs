use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::Result;
use crate::math::{first_interval_containing_root, improve_root};
use crate::panorama::{Builder, Panorama, PanoramaParameters, PanoramaSample};
use crate::physics::los::ray_to_ground_distance;
use crate::physics::refraction::RefractionParams;
use crate::terrain::{ElevationProfile, TerrainProvider};

/// Step of the coarse search for the first terrain intersection, in metres.
pub const COARSE_STEP: f64 = 64.0;
/// Width of the bracket left by the bisection refinement, in metres.
pub const ROOT_TOLERANCE: f64 = 4.0;

/// Casts one ray per pixel against the terrain.
pub struct PanoramaComputer<'a, T: ?Sized> {
    terrain: &'a T,
    refraction: RefractionParams,
}

impl<'a, T: TerrainProvider + Sync + ?Sized> PanoramaComputer<'a, T> {
    pub fn new(terrain: &'a T) -> Self {
        Self { terrain, refraction: RefractionParams::default() }
    }

    pub fn with_refraction(terrain: &'a T, refraction: RefractionParams) -> Self {
        Self { terrain, refraction }
    }

    pub fn compute_panorama(&self, parameters: &PanoramaParameters) -> Result<Panorama> {
        self.compute_panorama_with_progress(parameters, None)
    }

    /// Columns run in parallel; `progress` is bumped once per finished column.
    pub fn compute_panorama_with_progress(
        &self,
        parameters: &PanoramaParameters,
        progress: Option<Arc<AtomicU32>>,
    ) -> Result<Panorama> {
        let start = Instant::now();
        info!(
            width = parameters.width(),
            height = parameters.height(),
            max_distance = parameters.max_distance(),
            "computing panorama"
        );

        let columns = (0..parameters.width())
            .into_par_iter()
            .map(|x| {
                let column = self.compute_column(parameters, x);
                if let Some(p) = &progress {
                    p.fetch_add(1, Ordering::Relaxed);
                }
                column.map(|samples| (x, samples))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut builder = Builder::new(*parameters);
        for (x, samples) in columns {
            for (y, sample) in samples {
                builder.set_sample_at(x, y, sample)?;
            }
        }

        info!("panorama computed in {:.2?}", start.elapsed());
        Ok(builder.build())
    }

    /// Samples of column `x`, from the bottom row up to the last row that sees ground.
    fn compute_column(&self, parameters: &PanoramaParameters, x: usize) -> Result<Vec<(usize, PanoramaSample)>> {
        let max_distance = parameters.max_distance();
        let profile = ElevationProfile::new(
            self.terrain,
            parameters.observer_position(),
            parameters.azimuth_for_x(x as f64)?,
            max_distance,
        )?;

        let mut samples = Vec::new();
        let mut last_distance = 0.0;
        for y in (0..parameters.height()).rev() {
            let altitude = parameters.altitude_for_y(y as f64)?;
            let ray = ray_to_ground_distance(
                &profile,
                parameters.observer_elevation(),
                altitude.tan(),
                self.refraction,
            );

            let bracket = first_interval_containing_root(&ray, last_distance, max_distance, COARSE_STEP)?;
            if bracket.is_infinite() {
                // Rows above see no ground either.
                debug!(x, y, "column reaches the sky");
                break;
            }
            let d = improve_root(&ray, bracket, bracket + COARSE_STEP, ROOT_TOLERANCE)?.min(max_distance);

            let position = profile.position_at(d)?;
            samples.push((
                y,
                PanoramaSample {
                    distance: (d / altitude.cos()) as f32,
                    longitude: position.longitude() as f32,
                    latitude: position.latitude() as f32,
                    elevation: profile.elevation_at(d)? as f32,
                    slope: profile.slope_at(d)? as f32,
                },
            ));
            last_distance = d;
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::interval::{Interval1D, Interval2D};
    use crate::terrain::{ContinuousElevationModel, DiscreteElevationModel, Tile, SAMPLES_PER_DEGREE};

    const GROUND: i16 = 500;
    const OBSERVER_ELEVATION: f64 = 1500.0;
    const MAX_DISTANCE: f64 = 20_000.0;

    /// Flat ground at `GROUND` metres over 7.2°–7.8°E, 46.3°–46.7°N.
    fn flat_dem() -> DiscreteElevationModel {
        let degrees = |d: f64| (d * f64::from(SAMPLES_PER_DEGREE)).round() as i32;
        let extent = Interval2D::new(
            Interval1D::new(degrees(7.2), degrees(7.8)).unwrap(),
            Interval1D::new(degrees(46.3), degrees(46.7)).unwrap(),
        );
        Tile::from_samples(extent, vec![GROUND; extent.size() as usize]).unwrap().into()
    }

    fn parameters() -> PanoramaParameters {
        let observer = GeoPoint::from_degrees(7.5, 46.5).unwrap();
        PanoramaParameters::new(observer, OBSERVER_ELEVATION, 1.0, 40f64.to_radians(), MAX_DISTANCE, 41, 21)
            .unwrap()
    }

    /// Arc length at which a ray at `altitude` meets flat ground `h` metres below the observer.
    fn flat_ground_root(altitude: f64, h: f64) -> f64 {
        let c = RefractionParams::default().curvature_drop(1.0);
        let t = altitude.tan();
        2.0 * h / (-t + (t * t - 4.0 * c * h).sqrt())
    }

    #[test]
    fn flat_ground_distances_match_geometry() {
        let dem = flat_dem();
        let cem = ContinuousElevationModel::new(&dem);
        let params = parameters();
        let panorama = PanoramaComputer::new(&cem).compute_panorama(&params).unwrap();

        let h = OBSERVER_ELEVATION - f64::from(GROUND);
        let mut checked = 0;
        for y in 0..params.height() {
            let altitude = params.altitude_for_y(y as f64).unwrap();
            for x in 0..params.width() {
                let distance = f64::from(panorama.distance_at(x, y).unwrap());
                if altitude >= 0.0 {
                    assert!(distance.is_infinite(), "row {y} should see sky");
                    continue;
                }
                let expected = flat_ground_root(altitude, h);
                if expected < MAX_DISTANCE - 2.0 * COARSE_STEP {
                    let arc = distance * altitude.cos();
                    assert!(arc <= expected + 0.01 && expected - arc <= ROOT_TOLERANCE + 0.5, "({x}, {y})");
                    assert_eq!(panorama.elevation_at(x, y).unwrap(), f32::from(GROUND));
                    assert!(panorama.slope_at(x, y).unwrap().abs() < 1e-6);
                    checked += 1;
                }
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn hit_positions_lie_along_column_azimuth() {
        let dem = flat_dem();
        let cem = ContinuousElevationModel::new(&dem);
        let params = parameters();
        let panorama = PanoramaComputer::new(&cem).compute_panorama(&params).unwrap();

        let (x, y) = (10, params.height() - 1);
        let hit = GeoPoint::new(
            f64::from(panorama.longitude_at(x, y).unwrap()),
            f64::from(panorama.latitude_at(x, y).unwrap()),
        )
        .unwrap();
        let azimuth = params.observer_position().azimuth_to(hit);
        assert!((azimuth - params.azimuth_for_x(x as f64).unwrap()).abs() < 1e-3);
    }

    #[test]
    fn progress_counts_columns() {
        let dem = flat_dem();
        let cem = ContinuousElevationModel::new(&dem);
        let params = parameters();
        let progress = Arc::new(AtomicU32::new(0));
        PanoramaComputer::new(&cem)
            .compute_panorama_with_progress(&params, Some(progress.clone()))
            .unwrap();
        assert_eq!(progress.load(Ordering::Relaxed), params.width() as u32);
    }
}
