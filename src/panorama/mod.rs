pub mod computer;
pub mod parameters;

use serde::Serialize;

use crate::error::{PanoramaError, Result};

pub use computer::PanoramaComputer;
pub use parameters::PanoramaParameters;

/// What the ray through one pixel hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanoramaSample {
    /// Distance from the observer to the terrain point, in metres.
    pub distance: f32,
    pub longitude: f32,
    pub latitude: f32,
    pub elevation: f32,
    pub slope: f32,
}

/// Per-pixel results of a panorama computation, one array per quantity,
/// indexed by [`PanoramaParameters::linear_sample_index`].
///
/// Pixels whose ray never met the terrain have an infinite distance.
#[derive(Debug, Clone)]
pub struct Panorama {
    parameters: PanoramaParameters,
    distance: Box<[f32]>,
    longitude: Box<[f32]>,
    latitude: Box<[f32]>,
    elevation: Box<[f32]>,
    slope: Box<[f32]>,
}

impl Panorama {
    pub fn parameters(&self) -> &PanoramaParameters {
        &self.parameters
    }

    fn index(&self, x: usize, y: usize) -> Result<usize> {
        checked_index(&self.parameters, x, y)
    }

    pub fn distance_at(&self, x: usize, y: usize) -> Result<f32> {
        Ok(self.distance[self.index(x, y)?])
    }

    pub fn longitude_at(&self, x: usize, y: usize) -> Result<f32> {
        Ok(self.longitude[self.index(x, y)?])
    }

    pub fn latitude_at(&self, x: usize, y: usize) -> Result<f32> {
        Ok(self.latitude[self.index(x, y)?])
    }

    pub fn elevation_at(&self, x: usize, y: usize) -> Result<f32> {
        Ok(self.elevation[self.index(x, y)?])
    }

    pub fn slope_at(&self, x: usize, y: usize) -> Result<f32> {
        Ok(self.slope[self.index(x, y)?])
    }

    /// Distance at `(x, y)`, or `default` when the index falls outside the image.
    pub fn distance_at_or(&self, x: i64, y: i64, default: f32) -> f32 {
        if self.parameters.is_valid_sample_index(x, y) {
            self.distance[self.parameters.linear_sample_index(x as usize, y as usize)]
        } else {
            default
        }
    }

    pub fn sample_at(&self, x: usize, y: usize) -> Result<PanoramaSample> {
        let i = self.index(x, y)?;
        Ok(PanoramaSample {
            distance: self.distance[i],
            longitude: self.longitude[i],
            latitude: self.latitude[i],
            elevation: self.elevation[i],
            slope: self.slope[i],
        })
    }

    pub fn distances(&self) -> &[f32] {
        &self.distance
    }

    pub fn longitudes(&self) -> &[f32] {
        &self.longitude
    }

    pub fn latitudes(&self) -> &[f32] {
        &self.latitude
    }

    pub fn elevations(&self) -> &[f32] {
        &self.elevation
    }

    pub fn slopes(&self) -> &[f32] {
        &self.slope
    }
}

fn checked_index(parameters: &PanoramaParameters, x: usize, y: usize) -> Result<usize> {
    if x < parameters.width() && y < parameters.height() {
        Ok(parameters.linear_sample_index(x, y))
    } else {
        Err(PanoramaError::OutOfBounds { x: x as i64, y: y as i64 })
    }
}

/// Mutable grid filled while a panorama is computed. [`Builder::build`]
/// consumes it, so nothing can be written once the panorama exists.
#[derive(Debug)]
pub struct Builder {
    parameters: PanoramaParameters,
    distance: Vec<f32>,
    longitude: Vec<f32>,
    latitude: Vec<f32>,
    elevation: Vec<f32>,
    slope: Vec<f32>,
}

impl Builder {
    pub fn new(parameters: PanoramaParameters) -> Self {
        let len = parameters.width() * parameters.height();
        Self {
            parameters,
            distance: vec![f32::INFINITY; len],
            longitude: vec![0.0; len],
            latitude: vec![0.0; len],
            elevation: vec![0.0; len],
            slope: vec![0.0; len],
        }
    }

    pub fn parameters(&self) -> &PanoramaParameters {
        &self.parameters
    }

    pub fn set_distance_at(&mut self, x: usize, y: usize, distance: f32) -> Result<&mut Self> {
        let i = checked_index(&self.parameters, x, y)?;
        self.distance[i] = distance;
        Ok(self)
    }

    pub fn set_longitude_at(&mut self, x: usize, y: usize, longitude: f32) -> Result<&mut Self> {
        let i = checked_index(&self.parameters, x, y)?;
        self.longitude[i] = longitude;
        Ok(self)
    }

    pub fn set_latitude_at(&mut self, x: usize, y: usize, latitude: f32) -> Result<&mut Self> {
        let i = checked_index(&self.parameters, x, y)?;
        self.latitude[i] = latitude;
        Ok(self)
    }

    pub fn set_elevation_at(&mut self, x: usize, y: usize, elevation: f32) -> Result<&mut Self> {
        let i = checked_index(&self.parameters, x, y)?;
        self.elevation[i] = elevation;
        Ok(self)
    }

    pub fn set_slope_at(&mut self, x: usize, y: usize, slope: f32) -> Result<&mut Self> {
        let i = checked_index(&self.parameters, x, y)?;
        self.slope[i] = slope;
        Ok(self)
    }

    pub fn set_sample_at(&mut self, x: usize, y: usize, sample: PanoramaSample) -> Result<&mut Self> {
        let i = checked_index(&self.parameters, x, y)?;
        self.distance[i] = sample.distance;
        self.longitude[i] = sample.longitude;
        self.latitude[i] = sample.latitude;
        self.elevation[i] = sample.elevation;
        self.slope[i] = sample.slope;
        Ok(self)
    }

    pub fn build(self) -> Panorama {
        Panorama {
            parameters: self.parameters,
            distance: self.distance.into_boxed_slice(),
            longitude: self.longitude.into_boxed_slice(),
            latitude: self.latitude.into_boxed_slice(),
            elevation: self.elevation.into_boxed_slice(),
            slope: self.slope.into_boxed_slice(),
        }
    }
}
