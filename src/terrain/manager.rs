use std::num::NonZeroUsize;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use itertools::iproduct;
use lru::LruCache;
use tracing::debug;

use crate::error::{check_argument, PanoramaError, Result};
use crate::geo::{to_radians_distance, GeoPoint};
use crate::terrain::hgt::tile_file_name;
use crate::terrain::{DiscreteElevationModel, Tile};

/// Opens HGT tiles by their south-west corner from one directory.
#[derive(Debug, Clone)]
pub struct TerrainLoader {
    pub assets_path: PathBuf,
}

impl TerrainLoader {
    pub fn new(assets_path: PathBuf) -> Self {
        Self { assets_path }
    }

    pub fn tile_path(&self, lat: i32, lon: i32) -> PathBuf {
        self.assets_path.join(tile_file_name(lat, lon))
    }

    pub fn load_tile(&self, lat: i32, lon: i32) -> Result<Tile> {
        Tile::open(self.tile_path(lat, lon))
    }
}

/// Keeps recently used tiles mapped and assembles them into composite models.
pub struct TerrainManager {
    loader: TerrainLoader,
    cache: Mutex<LruCache<(i32, i32), Arc<Tile>>>,
}

impl TerrainManager {
    pub fn new(loader: TerrainLoader, cache_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self { loader, cache: Mutex::new(LruCache::new(capacity)) }
    }

    pub fn get_tile(&self, lat: i32, lon: i32) -> Result<Arc<Tile>> {
        {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(tile) = cache.get(&(lat, lon)) {
                debug!(lat, lon, "tile cache hit");
                return Ok(tile.clone());
            }
        }

        let tile = Arc::new(self.loader.load_tile(lat, lon)?);

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.put((lat, lon), tile.clone());
        Ok(tile)
    }

    /// Composite model of every one-degree tile whose south-west corner lies in the given ranges.
    pub fn region(
        &self,
        lats: RangeInclusive<i32>,
        lons: RangeInclusive<i32>,
    ) -> Result<DiscreteElevationModel> {
        check_argument(!lats.is_empty() && !lons.is_empty(), "empty tile region")?;
        let columns = lons.clone().count();

        let tiles = iproduct!(lats, lons)
            .map(|(lat, lon)| self.get_tile(lat, lon).map(DiscreteElevationModel::from))
            .collect::<Result<Vec<_>>>()?;

        // Rows first, so every union joins two full rectangles.
        let mut rows = Vec::new();
        let mut tiles = tiles.into_iter();
        loop {
            let mut row = tiles.by_ref().take(columns);
            let Some(first) = row.next() else { break };
            rows.push(row.try_fold(first, DiscreteElevationModel::union)?);
        }
        let mut rows = rows.into_iter();
        let first = rows
            .next()
            .ok_or_else(|| PanoramaError::InvalidArgument("empty tile region".to_string()))?;
        rows.try_fold(first, DiscreteElevationModel::union)
    }

    /// Composite model covering every point within `radius` metres of `center`.
    pub fn region_around(&self, center: GeoPoint, radius: f64) -> Result<DiscreteElevationModel> {
        check_argument(radius > 0.0, format!("invalid radius {radius}"))?;
        let d_lat = to_radians_distance(radius);
        let lat_min = (center.latitude() - d_lat).to_degrees().floor() as i32;
        let lat_max = (center.latitude() + d_lat).to_degrees().floor() as i32;

        let widest = (center.latitude().abs() + d_lat).min(89f64.to_radians());
        let d_lon = d_lat / widest.cos();
        let lon_min = (center.longitude() - d_lon).to_degrees().floor() as i32;
        let lon_max = (center.longitude() + d_lon).to_degrees().floor() as i32;

        self.region(lat_min.max(-90)..=lat_max.min(89), lon_min.max(-180)..=lon_max.min(179))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_paths_follow_hgt_naming() {
        let loader = TerrainLoader::new(PathBuf::from("/data/srtm"));
        assert_eq!(loader.tile_path(46, 7), PathBuf::from("/data/srtm/N46E007.hgt"));
    }

    #[test]
    fn missing_tile_is_an_error() {
        let manager = TerrainManager::new(TerrainLoader::new(PathBuf::from("/nonexistent/srtm")), 4);
        assert!(manager.get_tile(46, 7).is_err());
        assert!(manager.region_around(GeoPoint::from_degrees(7.5, 46.5).unwrap(), 10_000.0).is_err());
    }

    #[test]
    fn empty_region_is_rejected() {
        let manager = TerrainManager::new(TerrainLoader::new(PathBuf::from("/nonexistent/srtm")), 0);
        #[allow(clippy::reversed_empty_ranges)]
        let lats = 3..=2;
        assert!(manager.region(lats, 0..=1).is_err());
    }
}
