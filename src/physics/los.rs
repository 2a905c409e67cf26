use crate::error::{check_argument, Result};
use crate::geo::GeoPoint;
use crate::math::first_interval_containing_root;
use crate::physics::refraction::RefractionParams;
use crate::terrain::{ElevationProfile, TerrainProvider};

/// Coarse step of the occlusion scan, in metres.
pub const OCCLUSION_SCAN_STEP: f64 = 64.0;
/// Terrain closer to the target than this is never counted as occluding it.
pub const OCCLUSION_MARGIN: f64 = 200.0;

/// Height of a straight ray above the apparent ground at arc length `d`.
///
/// The ray leaves at `ray0` metres with slope `ray_slope`; the result is
/// negative once the ray is below the terrain.
pub fn ray_to_ground_distance<'p, T>(
    profile: &'p ElevationProfile<'_, T>,
    ray0: f64,
    ray_slope: f64,
    refraction: RefractionParams,
) -> impl Fn(f64) -> f64 + 'p
where
    T: TerrainProvider + ?Sized,
{
    move |d| ray0 + d * ray_slope - profile.elevation_clamped(d) + refraction.curvature_drop(d)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LosResult {
    pub is_visible: bool,
    pub distance_m: f64,
    pub azimuth: f64,
    /// Apparent altitude of the target, refraction included.
    pub altitude: f64,
    pub obstruction_dist_m: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LosSystem {
    pub refraction: RefractionParams,
}

impl LosSystem {
    pub fn new(refraction: RefractionParams) -> Self {
        Self { refraction }
    }

    /// Apparent altitude of a point `distance` metres away rising `height` metres
    /// above the observer.
    pub fn apparent_altitude(&self, height: f64, distance: f64) -> f64 {
        ((height - self.refraction.curvature_drop(distance)) / distance).atan()
    }

    /// Whether the straight line from the observer to `target` clears the terrain.
    pub fn check_visibility<T: TerrainProvider + ?Sized>(
        &self,
        terrain: &T,
        observer: GeoPoint,
        observer_elevation: f64,
        target: GeoPoint,
        target_elevation: f64,
    ) -> Result<LosResult> {
        let distance_m = observer.distance_to(target);
        check_argument(distance_m > 0.0, "target coincides with the observer")?;
        let azimuth = observer.azimuth_to(target);
        let altitude = self.apparent_altitude(target_elevation - observer_elevation, distance_m);

        let profile = ElevationProfile::new(terrain, observer, azimuth, distance_m)?;
        let ray = ray_to_ground_distance(&profile, observer_elevation, altitude.tan(), self.refraction);
        let scan_end = (distance_m - OCCLUSION_MARGIN).max(0.0);
        let obstruction = first_interval_containing_root(ray, 0.0, scan_end, OCCLUSION_SCAN_STEP)?;

        Ok(LosResult {
            is_visible: obstruction.is_infinite(),
            distance_m,
            azimuth,
            altitude,
            obstruction_dist_m: obstruction.is_finite().then_some(obstruction),
        })
    }
}
