use std::f64::consts::PI;

use serde::Serialize;

use crate::error::{check_argument, Result};
use crate::geo::{azimuth, GeoPoint};
use crate::math::{angular_distance, floor_mod, PI2};

/// Slack for angles that land on the edge of the field of view after rounding.
const ANGLE_TOLERANCE: f64 = 1e-10;

/// Observer, view direction and image geometry of one panorama.
///
/// Pixel columns map linearly to azimuths around `center_azimuth`, rows map
/// linearly to altitudes, row 0 being the highest. Both axes share the same
/// angle per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanoramaParameters {
    observer_position: GeoPoint,
    observer_elevation: f64,
    center_azimuth: f64,
    horizontal_field_of_view: f64,
    max_distance: f64,
    width: usize,
    height: usize,
}

impl PanoramaParameters {
    pub fn new(
        observer_position: GeoPoint,
        observer_elevation: f64,
        center_azimuth: f64,
        horizontal_field_of_view: f64,
        max_distance: f64,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        check_argument(
            azimuth::is_canonical(center_azimuth),
            format!("center azimuth {center_azimuth} is not canonical"),
        )?;
        check_argument(
            horizontal_field_of_view > 0.0 && horizontal_field_of_view <= PI2,
            format!("horizontal field of view {horizontal_field_of_view} outside (0, 2π]"),
        )?;
        check_argument(
            observer_elevation >= 0.0 && observer_elevation.is_finite(),
            format!("invalid observer elevation {observer_elevation}"),
        )?;
        check_argument(
            max_distance > 0.0 && max_distance.is_finite(),
            format!("invalid max distance {max_distance}"),
        )?;
        check_argument(width >= 2, format!("width {width} must be at least 2"))?;
        check_argument(height >= 1, "height must be positive")?;
        let vertical_field_of_view = horizontal_field_of_view * (height - 1) as f64 / (width - 1) as f64;
        check_argument(
            vertical_field_of_view < PI,
            format!("vertical field of view {vertical_field_of_view} must stay below π"),
        )?;

        Ok(Self {
            observer_position,
            observer_elevation,
            center_azimuth,
            horizontal_field_of_view,
            max_distance,
            width,
            height,
        })
    }

    pub fn observer_position(&self) -> GeoPoint {
        self.observer_position
    }

    pub fn observer_elevation(&self) -> f64 {
        self.observer_elevation
    }

    pub fn center_azimuth(&self) -> f64 {
        self.center_azimuth
    }

    pub fn horizontal_field_of_view(&self) -> f64 {
        self.horizontal_field_of_view
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn angle_per_pixel(&self) -> f64 {
        self.horizontal_field_of_view / (self.width - 1) as f64
    }

    pub fn vertical_field_of_view(&self) -> f64 {
        self.angle_per_pixel() * (self.height - 1) as f64
    }

    fn center_x(&self) -> f64 {
        (self.width - 1) as f64 / 2.0
    }

    fn center_y(&self) -> f64 {
        (self.height - 1) as f64 / 2.0
    }

    pub fn azimuth_for_x(&self, x: f64) -> Result<f64> {
        check_argument(
            (0.0..=(self.width - 1) as f64).contains(&x),
            format!("column {x} outside [0, {}]", self.width - 1),
        )?;
        let azimuth = floor_mod(self.center_azimuth + self.angle_per_pixel() * (x - self.center_x()), PI2);
        Ok(azimuth::canonicalize(azimuth))
    }

    pub fn x_for_azimuth(&self, a: f64) -> Result<f64> {
        let offset = angular_distance(self.center_azimuth, a);
        check_argument(
            offset.abs() <= self.horizontal_field_of_view / 2.0 + ANGLE_TOLERANCE,
            format!("azimuth {a} outside the horizontal field of view"),
        )?;
        Ok(offset / self.angle_per_pixel() + self.center_x())
    }

    pub fn altitude_for_y(&self, y: f64) -> Result<f64> {
        check_argument(
            (0.0..=(self.height - 1) as f64).contains(&y),
            format!("row {y} outside [0, {}]", self.height - 1),
        )?;
        Ok((self.center_y() - y) * self.angle_per_pixel())
    }

    pub fn y_for_altitude(&self, a: f64) -> Result<f64> {
        check_argument(
            a.abs() <= self.vertical_field_of_view() / 2.0 + ANGLE_TOLERANCE,
            format!("altitude {a} outside the vertical field of view"),
        )?;
        Ok(self.center_y() - a / self.angle_per_pixel())
    }

    pub fn is_valid_sample_index(&self, x: i64, y: i64) -> bool {
        (0..self.width as i64).contains(&x) && (0..self.height as i64).contains(&y)
    }

    pub fn linear_sample_index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }
}
