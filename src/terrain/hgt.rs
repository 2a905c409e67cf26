//! SRTM one arc-second (`.hgt`) tiles.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use tracing::debug;

use crate::error::{check_argument, PanoramaError, Result};
use crate::interval::{Interval1D, Interval2D};
use crate::terrain::SAMPLES_PER_DEGREE;

/// Samples per side of a one-degree tile, border rows included.
pub const SRTM1_SIZE: usize = 3601;
pub const SRTM1_FILE_LEN: u64 = (SRTM1_SIZE * SRTM1_SIZE * 2) as u64;

#[derive(Debug)]
enum SampleStore {
    /// Big-endian i16 samples straight from the file.
    Mapped(Mmap),
    InMemory(Box<[i16]>),
}

impl SampleStore {
    fn get(&self, index: usize) -> i16 {
        match self {
            Self::Mapped(raw) => {
                let start = index * 2;
                i16::from_be_bytes([raw[start], raw[start + 1]])
            }
            Self::InMemory(samples) => samples[index],
        }
    }
}

/// A rectangular block of samples, stored north row first.
#[derive(Debug)]
pub struct Tile {
    extent: Interval2D,
    store: SampleStore,
}

impl Tile {
    /// Memory-maps the HGT file at `path`. Its name gives the south-west corner.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (latitude, longitude) = parse_sw_corner(path)?;

        let file = File::open(path)?;
        let len = file.metadata()?.len();
        if len != SRTM1_FILE_LEN {
            return Err(PanoramaError::InvalidTileSize(len));
        }
        // SAFETY: the file is opened read-only and never written through this mapping.
        let mmap = unsafe { Mmap::map(&file)? };
        debug!(path = %path.display(), latitude, longitude, "mapped HGT tile");

        Ok(Self { extent: hgt_extent(latitude, longitude)?, store: SampleStore::Mapped(mmap) })
    }

    /// Builds a tile from samples laid out row by row, northernmost row first.
    pub fn from_samples(extent: Interval2D, samples: Vec<i16>) -> Result<Self> {
        check_argument(
            samples.len() as u64 == extent.size(),
            format!("{} samples do not fill extent {extent}", samples.len()),
        )?;
        Ok(Self { extent, store: SampleStore::InMemory(samples.into_boxed_slice()) })
    }

    pub fn extent(&self) -> Interval2D {
        self.extent
    }

    pub fn elevation_sample(&self, x: i32, y: i32) -> Result<f64> {
        if !self.extent.contains(x, y) {
            return Err(PanoramaError::OutOfBounds { x: x.into(), y: y.into() });
        }
        let columns = self.extent.x().size() as usize;
        let row = (self.extent.y().included_to() - y) as usize;
        let column = (x - self.extent.x().included_from()) as usize;
        Ok(f64::from(self.store.get(row * columns + column)))
    }
}

/// Sample extent of the one-degree tile whose south-west corner is at the given degrees.
pub fn hgt_extent(latitude: i32, longitude: i32) -> Result<Interval2D> {
    Ok(Interval2D::new(
        Interval1D::new(longitude * SAMPLES_PER_DEGREE, (longitude + 1) * SAMPLES_PER_DEGREE)?,
        Interval1D::new(latitude * SAMPLES_PER_DEGREE, (latitude + 1) * SAMPLES_PER_DEGREE)?,
    ))
}

pub fn tile_file_name(latitude: i32, longitude: i32) -> String {
    format!(
        "{}{:02}{}{:03}.hgt",
        if latitude >= 0 { "N" } else { "S" },
        latitude.abs(),
        if longitude >= 0 { "E" } else { "W" },
        longitude.abs()
    )
}

/// Parses `[NS]dd[EW]ddd.hgt` into the signed (latitude, longitude) of the south-west corner.
pub fn parse_sw_corner(path: &Path) -> Result<(i32, i32)> {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let invalid = || PanoramaError::InvalidTileName(name.to_string());

    let bytes = name.as_bytes();
    if bytes.len() != 11 || !name.is_ascii() || &name[7..] != ".hgt" {
        return Err(invalid());
    }
    let digits = |s: &str| -> Result<i32> {
        if s.bytes().all(|b| b.is_ascii_digit()) {
            s.parse().map_err(|_| invalid())
        } else {
            Err(invalid())
        }
    };
    let latitude = match bytes[0] {
        b'N' => digits(&name[1..3])?,
        b'S' => -digits(&name[1..3])?,
        _ => return Err(invalid()),
    };
    let longitude = match bytes[3] {
        b'E' => digits(&name[4..7])?,
        b'W' => -digits(&name[4..7])?,
        _ => return Err(invalid()),
    };
    if !(-90..90).contains(&latitude) || !(-180..180).contains(&longitude) {
        return Err(invalid());
    }
    Ok((latitude, longitude))
}
