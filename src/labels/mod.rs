//! Selection and placement of summit labels over a panorama.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::math::angular_distance;
use crate::panorama::PanoramaParameters;
use crate::physics::los::LosSystem;
use crate::physics::refraction::RefractionParams;
use crate::summit::Summit;
use crate::terrain::TerrainProvider;

/// Rows kept free above the highest label anchor for the rotated text.
pub const ABOVE_BORDER: usize = 170;
/// Width of the column band claimed by one label, and of the side margins.
pub const SIDE_BORDER: usize = 20;
/// Length of the connector between the baseline and a summit, at its shortest.
pub const LINE_LENGTH: usize = 20;
/// Gap left between the end of the connector and the summit itself.
pub const LINE_TO_SUMMIT_PIXELS: usize = 2;
/// Rotation of the label text, in degrees (negative is counter-clockwise).
pub const TEXT_ROTATION: f64 = -60.0;

/// A placed label: connector from `line_from` (just above the summit) up to
/// `line_to` on the shared baseline, text written from `text_position`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub summit: Summit,
    pub anchor: (usize, usize),
    pub line_from: (usize, usize),
    pub line_to: (usize, usize),
    pub text_position: (usize, usize),
    pub text_rotation: f64,
}

struct VisibleSummit<'s> {
    summit: &'s Summit,
    x: usize,
    y: usize,
}

/// Band of claimed columns, one flag per image column.
struct ColumnBands(Vec<bool>);

impl ColumnBands {
    fn new(width: usize) -> Self {
        Self(vec![false; width])
    }

    fn is_free(&self, x: usize) -> bool {
        self.0[x..x + SIDE_BORDER].iter().all(|claimed| !claimed)
    }

    fn claim(&mut self, x: usize) {
        self.0[x..x + SIDE_BORDER].fill(true);
    }
}

pub struct Labelizer<'a, T: ?Sized> {
    terrain: &'a T,
    summits: Vec<Summit>,
    los: LosSystem,
}

impl<'a, T: TerrainProvider + ?Sized> Labelizer<'a, T> {
    pub fn new(terrain: &'a T, summits: Vec<Summit>) -> Self {
        Self::with_refraction(terrain, summits, RefractionParams::default())
    }

    pub fn with_refraction(terrain: &'a T, summits: Vec<Summit>, refraction: RefractionParams) -> Self {
        Self { terrain, summits, los: LosSystem::new(refraction) }
    }

    pub fn summits(&self) -> &[Summit] {
        &self.summits
    }

    /// Summits inside the field of view with a clear line of sight, with
    /// their pixel position.
    fn visible_summits(&self, parameters: &PanoramaParameters) -> Result<Vec<VisibleSummit<'_>>> {
        let observer = parameters.observer_position();
        let observer_elevation = parameters.observer_elevation();
        let half_hfov = parameters.horizontal_field_of_view() / 2.0;
        let half_vfov = parameters.vertical_field_of_view() / 2.0;

        let mut visible = Vec::new();
        for summit in &self.summits {
            let distance = observer.distance_to(summit.position());
            if distance <= 0.0 || distance > parameters.max_distance() {
                continue;
            }
            let azimuth = observer.azimuth_to(summit.position());
            if angular_distance(parameters.center_azimuth(), azimuth).abs() > half_hfov + 1e-10 {
                continue;
            }
            let elevation = f64::from(summit.elevation());
            let altitude = self.los.apparent_altitude(elevation - observer_elevation, distance);
            if altitude.abs() > half_vfov {
                continue;
            }

            let los = self.los.check_visibility(
                self.terrain,
                observer,
                observer_elevation,
                summit.position(),
                elevation,
            )?;
            if !los.is_visible {
                debug!(summit = summit.name(), obstruction = ?los.obstruction_dist_m, "summit hidden");
                continue;
            }
            visible.push(VisibleSummit {
                summit,
                x: parameters.x_for_azimuth(azimuth)?.round() as usize,
                y: parameters.y_for_altitude(altitude)?.round() as usize,
            });
        }
        Ok(visible)
    }

    /// Places labels greedily, topmost summits first, the higher one winning a
    /// tie. A summit gets a label only if the `SIDE_BORDER` columns starting at
    /// its own are all still free.
    pub fn labels(&self, parameters: &PanoramaParameters) -> Result<Vec<Label>> {
        let mut visible = self.visible_summits(parameters)?;
        visible.sort_by_key(|v| (v.y, std::cmp::Reverse(v.summit.elevation())));

        let width = parameters.width();
        let mut bands = ColumnBands::new(width);
        let mut baseline = None;
        let mut labels = Vec::new();
        for VisibleSummit { summit, x, y } in visible {
            let inside = x >= SIDE_BORDER && x + SIDE_BORDER <= width && y >= ABOVE_BORDER;
            if !inside || !bands.is_free(x) {
                continue;
            }
            bands.claim(x);
            let line_y = *baseline.get_or_insert(y - LINE_LENGTH - LINE_TO_SUMMIT_PIXELS);
            labels.push(Label {
                summit: summit.clone(),
                anchor: (x, y),
                line_from: (x, y - LINE_TO_SUMMIT_PIXELS),
                line_to: (x, line_y),
                text_position: (x, line_y),
                text_rotation: TEXT_ROTATION,
            });
        }
        debug!(placed = labels.len(), "labels placed");
        Ok(labels)
    }
}
