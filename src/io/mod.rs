//! CSV export of computed panoramas and placed labels.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::labels::Label;
use crate::panorama::Panorama;

#[derive(Serialize)]
struct SampleRecord {
    x: usize,
    y: usize,
    distance: f32,
    longitude: f32,
    latitude: f32,
    elevation: f32,
    slope: f32,
}

#[derive(Serialize)]
struct LabelRecord<'a> {
    name: &'a str,
    elevation: i32,
    x: usize,
    y: usize,
    baseline_y: usize,
    text_rotation: f64,
}

/// One row per pixel that sees the terrain, angles in radians.
pub fn write_panorama_csv<W: Write>(panorama: &Panorama, writer: W) -> Result<usize> {
    let parameters = panorama.parameters();
    let mut csv = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for y in 0..parameters.height() {
        for x in 0..parameters.width() {
            let sample = panorama.sample_at(x, y)?;
            if sample.distance.is_infinite() {
                continue;
            }
            csv.serialize(SampleRecord {
                x,
                y,
                distance: sample.distance,
                longitude: sample.longitude,
                latitude: sample.latitude,
                elevation: sample.elevation,
                slope: sample.slope,
            })?;
            rows += 1;
        }
    }
    csv.flush()?;
    Ok(rows)
}

pub fn write_labels_csv<W: Write>(labels: &[Label], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for label in labels {
        csv.serialize(LabelRecord {
            name: label.summit.name(),
            elevation: label.summit.elevation(),
            x: label.anchor.0,
            y: label.anchor.1,
            baseline_y: label.line_to.1,
            text_rotation: label.text_rotation,
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn save_panorama_csv<P: AsRef<Path>>(panorama: &Panorama, path: P) -> Result<()> {
    let path = path.as_ref();
    let rows = write_panorama_csv(panorama, File::create(path)?)?;
    info!(path = %path.display(), rows, "panorama written");
    Ok(())
}

pub fn save_labels_csv<P: AsRef<Path>>(labels: &[Label], path: P) -> Result<()> {
    let path = path.as_ref();
    write_labels_csv(labels, File::create(path)?)?;
    info!(path = %path.display(), labels = labels.len(), "labels written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::labels::TEXT_ROTATION;
    use crate::panorama::{Builder, PanoramaParameters, PanoramaSample};
    use crate::summit::Summit;

    #[test]
    fn panorama_rows_skip_sky() {
        let observer = GeoPoint::from_degrees(7.0, 46.0).unwrap();
        let params = PanoramaParameters::new(observer, 500.0, 0.0, 1.0, 10_000.0, 3, 2).unwrap();
        let mut builder = Builder::new(params);
        let sample = PanoramaSample { distance: 1500.0, longitude: 0.1, latitude: 0.8, elevation: 900.0, slope: 0.25 };
        builder.set_sample_at(2, 1, sample).unwrap();

        let mut out = Vec::new();
        let rows = write_panorama_csv(&builder.build(), &mut out).unwrap();
        assert_eq!(rows, 1);
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("x,y,distance,longitude,latitude,elevation,slope"));
        assert_eq!(lines.next(), Some("2,1,1500.0,0.1,0.8,900.0,0.25"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn label_rows() {
        let summit = Summit::new("EIGER", GeoPoint::from_degrees(8.0, 46.6).unwrap(), 3970).unwrap();
        let label = Label {
            summit,
            anchor: (300, 200),
            line_from: (300, 198),
            line_to: (300, 178),
            text_position: (300, 178),
            text_rotation: TEXT_ROTATION,
        };
        let mut out = Vec::new();
        write_labels_csv(&[label], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "name,elevation,x,y,baseline_y,text_rotation\nEIGER,3970,300,200,178,-60.0\n");
    }
}
