//! User-facing panorama settings, in the integer units a person would type:
//! 1e-4 degrees for the observer position, metres, whole degrees, kilometres
//! and pixels.

use std::fs::File;
use std::io::BufReader;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::geo::GeoPoint;
use crate::panorama::PanoramaParameters;

/// Largest vertical field of view a panorama may span, in degrees.
pub const MAX_VERTICAL_FIELD_OF_VIEW: i32 = 170;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserParameter {
    ObserverLongitude,
    ObserverLatitude,
    ObserverElevation,
    CenterAzimuth,
    HorizontalFieldOfView,
    MaxDistance,
    Width,
    Height,
    SuperSamplingExponent,
}

impl UserParameter {
    pub const ALL: [UserParameter; 9] = [
        Self::ObserverLongitude,
        Self::ObserverLatitude,
        Self::ObserverElevation,
        Self::CenterAzimuth,
        Self::HorizontalFieldOfView,
        Self::MaxDistance,
        Self::Width,
        Self::Height,
        Self::SuperSamplingExponent,
    ];

    pub fn range(self) -> RangeInclusive<i32> {
        match self {
            Self::ObserverLongitude => 60_000..=120_000,
            Self::ObserverLatitude => 450_000..=480_000,
            Self::ObserverElevation => 300..=10_000,
            Self::CenterAzimuth => 0..=359,
            Self::HorizontalFieldOfView => 1..=360,
            Self::MaxDistance => 10..=600,
            Self::Width => 30..=16_000,
            Self::Height => 10..=4000,
            Self::SuperSamplingExponent => 0..=2,
        }
    }

    /// Clamps `value` into the parameter's range.
    pub fn sanitize(self, value: i32) -> i32 {
        let range = self.range();
        value.clamp(*range.start(), *range.end())
    }
}

#[derive(Deserialize)]
struct RawUserParameters {
    observer_longitude: i32,
    observer_latitude: i32,
    observer_elevation: i32,
    center_azimuth: i32,
    horizontal_field_of_view: i32,
    max_distance: i32,
    width: i32,
    height: i32,
    #[serde(default)]
    super_sampling_exponent: i32,
}

impl From<RawUserParameters> for PanoramaUserParameters {
    fn from(raw: RawUserParameters) -> Self {
        Self::new(
            raw.observer_longitude,
            raw.observer_latitude,
            raw.observer_elevation,
            raw.center_azimuth,
            raw.horizontal_field_of_view,
            raw.max_distance,
            raw.width,
            raw.height,
            raw.super_sampling_exponent,
        )
    }
}

/// A sanitized set of user parameters. Values out of range are clamped and the
/// height is capped so the vertical field of view stays within
/// [`MAX_VERTICAL_FIELD_OF_VIEW`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawUserParameters")]
pub struct PanoramaUserParameters {
    observer_longitude: i32,
    observer_latitude: i32,
    observer_elevation: i32,
    center_azimuth: i32,
    horizontal_field_of_view: i32,
    max_distance: i32,
    width: i32,
    height: i32,
    super_sampling_exponent: i32,
}

impl PanoramaUserParameters {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        observer_longitude: i32,
        observer_latitude: i32,
        observer_elevation: i32,
        center_azimuth: i32,
        horizontal_field_of_view: i32,
        max_distance: i32,
        width: i32,
        height: i32,
        super_sampling_exponent: i32,
    ) -> Self {
        use UserParameter::*;

        let width = Width.sanitize(width);
        let horizontal_field_of_view = HorizontalFieldOfView.sanitize(horizontal_field_of_view);
        let max_height = MAX_VERTICAL_FIELD_OF_VIEW * (width - 1) / horizontal_field_of_view + 1;

        Self {
            observer_longitude: ObserverLongitude.sanitize(observer_longitude),
            observer_latitude: ObserverLatitude.sanitize(observer_latitude),
            observer_elevation: ObserverElevation.sanitize(observer_elevation),
            center_azimuth: CenterAzimuth.sanitize(center_azimuth),
            horizontal_field_of_view,
            max_distance: MaxDistance.sanitize(max_distance),
            width,
            height: Height.sanitize(height).min(max_height),
            super_sampling_exponent: SuperSamplingExponent.sanitize(super_sampling_exponent),
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let parameters = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        debug!(path = %path.display(), "panorama parameters loaded");
        Ok(parameters)
    }

    pub fn get(&self, parameter: UserParameter) -> i32 {
        match parameter {
            UserParameter::ObserverLongitude => self.observer_longitude,
            UserParameter::ObserverLatitude => self.observer_latitude,
            UserParameter::ObserverElevation => self.observer_elevation,
            UserParameter::CenterAzimuth => self.center_azimuth,
            UserParameter::HorizontalFieldOfView => self.horizontal_field_of_view,
            UserParameter::MaxDistance => self.max_distance,
            UserParameter::Width => self.width,
            UserParameter::Height => self.height,
            UserParameter::SuperSamplingExponent => self.super_sampling_exponent,
        }
    }

    /// Copy with one parameter replaced, sanitized again as a whole.
    pub fn with(&self, parameter: UserParameter, value: i32) -> Self {
        let mut values = UserParameter::ALL.map(|p| self.get(p));
        values[parameter as usize] = value;
        let [lon, lat, elevation, azimuth, hfov, max_distance, width, height, exponent] = values;
        Self::new(lon, lat, elevation, azimuth, hfov, max_distance, width, height, exponent)
    }

    pub fn observer_position(&self) -> Result<GeoPoint> {
        GeoPoint::from_degrees(
            f64::from(self.observer_longitude) / 1e4,
            f64::from(self.observer_latitude) / 1e4,
        )
    }

    pub fn super_sampling_factor(&self) -> usize {
        1 << self.super_sampling_exponent
    }

    fn parameters_with_scale(&self, scale: usize) -> Result<PanoramaParameters> {
        PanoramaParameters::new(
            self.observer_position()?,
            f64::from(self.observer_elevation),
            f64::from(self.center_azimuth).to_radians(),
            f64::from(self.horizontal_field_of_view).to_radians(),
            f64::from(self.max_distance) * 1000.0,
            self.width as usize * scale,
            self.height as usize * scale,
        )
    }

    /// Parameters of the computed panorama, super-sampled.
    pub fn panorama_parameters(&self) -> Result<PanoramaParameters> {
        self.parameters_with_scale(self.super_sampling_factor())
    }

    /// Parameters at display resolution.
    pub fn panorama_display_parameters(&self) -> Result<PanoramaParameters> {
        self.parameters_with_scale(1)
    }
}

const PRESET_MAX_DISTANCE: i32 = 300;
const PRESET_WIDTH: i32 = 2500;
const PRESET_HEIGHT: i32 = 800;

fn preset_view(longitude: i32, latitude: i32, elevation: i32, azimuth: i32, hfov: i32) -> PanoramaUserParameters {
    PanoramaUserParameters::new(
        longitude,
        latitude,
        elevation,
        azimuth,
        hfov,
        PRESET_MAX_DISTANCE,
        PRESET_WIDTH,
        PRESET_HEIGHT,
        0,
    )
}

/// The predefined panoramas, by name.
pub fn presets() -> [(&'static str, PanoramaUserParameters); 6] {
    [
        ("niesen", preset_view(76_500, 467_300, 600, 180, 110)),
        ("jura-alps", preset_view(68_087, 470_085, 1380, 162, 27)),
        ("mont-racine", preset_view(68_200, 470_200, 1500, 135, 45)),
        ("finsteraarhorn", preset_view(81_260, 465_374, 4300, 205, 20)),
        ("sauvabelin", preset_view(66_385, 465_353, 700, 135, 100)),
        ("pelican-beach", preset_view(65_728, 465_132, 380, 135, 60)),
    ]
}

pub fn preset(name: &str) -> Option<PanoramaUserParameters> {
    presets()
        .into_iter()
        .find(|(preset_name, _)| preset_name.eq_ignore_ascii_case(name))
        .map(|(_, parameters)| parameters)
}
