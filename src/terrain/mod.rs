pub mod continuous;
pub mod hgt;
pub mod manager;
pub mod profile;

use std::f64::consts::PI;
use std::sync::Arc;

use tracing::debug;

use crate::error::{PanoramaError, Result};
use crate::geo::GeoPoint;
use crate::interval::Interval2D;

pub use continuous::ContinuousElevationModel;
pub use hgt::Tile;
pub use manager::{TerrainLoader, TerrainManager};
pub use profile::ElevationProfile;

pub const SAMPLES_PER_DEGREE: i32 = 3600;
pub const SAMPLES_PER_RADIAN: f64 = SAMPLES_PER_DEGREE as f64 * 180.0 / PI;

/// Fractional sample index of a longitude or latitude given in radians.
#[inline]
pub fn sample_index(angle: f64) -> f64 {
    angle * SAMPLES_PER_RADIAN
}

/// Continuous terrain queried by the ray marcher.
pub trait TerrainProvider {
    fn elevation_at(&self, p: GeoPoint) -> f64;
    fn slope_at(&self, p: GeoPoint) -> f64;
}

/// Elevation samples on the global arc-second grid.
///
/// Tiles are combined with [`DiscreteElevationModel::union`]; lookups go to the
/// left operand whenever its extent contains the sample.
#[derive(Debug, Clone)]
pub enum DiscreteElevationModel {
    Tile(Arc<Tile>),
    Composite {
        extent: Interval2D,
        left: Box<DiscreteElevationModel>,
        right: Box<DiscreteElevationModel>,
    },
}

impl From<Tile> for DiscreteElevationModel {
    fn from(tile: Tile) -> Self {
        Self::Tile(Arc::new(tile))
    }
}

impl From<Arc<Tile>> for DiscreteElevationModel {
    fn from(tile: Arc<Tile>) -> Self {
        Self::Tile(tile)
    }
}

impl DiscreteElevationModel {
    pub fn extent(&self) -> Interval2D {
        match self {
            Self::Tile(tile) => tile.extent(),
            Self::Composite { extent, .. } => *extent,
        }
    }

    pub fn elevation_sample(&self, x: i32, y: i32) -> Result<f64> {
        match self {
            Self::Tile(tile) => tile.elevation_sample(x, y),
            Self::Composite { extent, left, right } => {
                if !extent.contains(x, y) {
                    return Err(PanoramaError::OutOfBounds { x: x.into(), y: y.into() });
                }
                if left.extent().contains(x, y) {
                    left.elevation_sample(x, y)
                } else {
                    right.elevation_sample(x, y)
                }
            }
        }
    }

    pub fn union(self, that: DiscreteElevationModel) -> Result<DiscreteElevationModel> {
        let extent = self.extent().union(&that.extent())?;
        Ok(Self::Composite { extent, left: Box::new(self), right: Box::new(that) })
    }

    /// Releases this handle on the underlying tiles. A memory-mapped buffer is
    /// unmapped once no other model or cache shares its tile.
    pub fn close(self) {
        debug!(extent = %self.extent(), "closing elevation model");
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval1D;

    fn flat(x0: i32, x1: i32, y0: i32, y1: i32, value: i16) -> DiscreteElevationModel {
        let extent = Interval2D::new(Interval1D::new(x0, x1).unwrap(), Interval1D::new(y0, y1).unwrap());
        Tile::from_samples(extent, vec![value; extent.size() as usize]).unwrap().into()
    }

    #[test]
    fn composite_dispatches_left_first() {
        let left = flat(0, 10, 0, 10, 1);
        let right = flat(5, 20, 0, 10, 2);
        let dem = left.union(right).unwrap();
        assert_eq!(dem.extent().x(), Interval1D::new(0, 20).unwrap());
        assert_eq!(dem.elevation_sample(7, 3).unwrap(), 1.0);
        assert_eq!(dem.elevation_sample(15, 3).unwrap(), 2.0);
        assert!(dem.elevation_sample(21, 3).is_err());
    }

    #[test]
    fn composite_gap_is_not_queryable() {
        let dem = flat(0, 10, 0, 10, 1).union(flat(11, 20, 11, 20, 2)).unwrap();
        assert_eq!(dem.extent().size(), 21 * 21);
        assert!(dem.elevation_sample(15, 5).is_err());
        assert_eq!(dem.elevation_sample(15, 15).unwrap(), 2.0);
    }

    #[test]
    fn union_rejects_disjoint_tiles() {
        assert!(flat(0, 10, 0, 10, 1).union(flat(12, 20, 0, 10, 2)).is_err());
    }
}
