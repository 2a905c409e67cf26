//! Reader for the fixed-column summit gazetteer.
//!
//! Each line carries, at fixed byte offsets, the longitude and latitude as
//! `d:m:s`, the elevation in metres, a few unused classification codes and the
//! summit name:
//!
//! ```text
//!   7:56:53 46:35:33  2472  H1 C02 D0 LAUBERHORN
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Range;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{PanoramaError, Result};
use crate::geo::GeoPoint;
use crate::summit::Summit;

const LONGITUDE: Range<usize> = 0..9;
const LATITUDE: Range<usize> = 10..18;
const ELEVATION: Range<usize> = 20..24;
const NAME_START: usize = 36;

fn field(line: &str, range: Range<usize>) -> std::result::Result<&str, String> {
    line.get(range.clone())
        .map(str::trim)
        .ok_or_else(|| format!("line too short for columns {}..{}", range.start, range.end))
}

/// Parses `d:m:s` into radians.
fn parse_dms(text: &str) -> std::result::Result<f64, String> {
    let parts = text
        .split(':')
        .map(|p| p.parse::<u32>().map_err(|e| format!("bad angle {text:?}: {e}")))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let [d, m, s] = parts[..] else {
        return Err(format!("angle {text:?} is not d:m:s"));
    };
    if m >= 60 || s >= 60 {
        return Err(format!("angle {text:?} has minutes or seconds out of range"));
    }
    Ok((f64::from(d) + f64::from(m) / 60.0 + f64::from(s) / 3600.0).to_radians())
}

fn parse_line(line: &str) -> std::result::Result<Summit, String> {
    let longitude = parse_dms(field(line, LONGITUDE)?)?;
    let latitude = parse_dms(field(line, LATITUDE)?)?;
    let elevation = field(line, ELEVATION)?
        .parse::<i32>()
        .map_err(|e| format!("bad elevation: {e}"))?;
    let name = line.get(NAME_START..).map(str::trim).unwrap_or_default();

    let position = GeoPoint::new(longitude, latitude).map_err(|e| e.to_string())?;
    Summit::new(name, position, elevation).map_err(|e| e.to_string())
}

/// Parses one gazetteer line; `line_number` only labels the error.
pub fn read_summit_line(line: &str, line_number: usize) -> Result<Summit> {
    parse_line(line).map_err(|reason| PanoramaError::Gazetteer { line: line_number, reason })
}

/// Parses every line of `reader`, failing on the first malformed one.
pub fn read_summits<R: BufRead>(reader: R) -> Result<Vec<Summit>> {
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| read_summit_line(&line?, i + 1))
        .collect()
}

/// Parses every line of `reader`, dropping malformed ones with a warning.
/// I/O errors still abort the read.
pub fn read_summits_lenient<R: BufRead>(reader: R) -> Result<Vec<Summit>> {
    let mut summits = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match read_summit_line(&line, i + 1) {
            Ok(summit) => summits.push(summit),
            Err(e) => warn!("skipping summit: {e}"),
        }
    }
    Ok(summits)
}

pub fn read_summits_from<P: AsRef<Path>>(path: P) -> Result<Vec<Summit>> {
    let path = path.as_ref();
    let summits = read_summits(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), count = summits.len(), "gazetteer loaded");
    Ok(summits)
}

pub fn read_summits_lenient_from<P: AsRef<Path>>(path: P) -> Result<Vec<Summit>> {
    let path = path.as_ref();
    let summits = read_summits_lenient(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), count = summits.len(), "gazetteer loaded");
    Ok(summits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LAUBERHORN: &str = "  7:56:53 46:35:33  2472  H1 C02 D0 LAUBERHORN";
    const EIGER: &str = "  8:00:19 46:34:39  3970  H1 C01 D0 EIGER";

    #[test]
    fn parses_fixed_columns() {
        let summit = read_summit_line(LAUBERHORN, 1).unwrap();
        assert_eq!(summit.name(), "LAUBERHORN");
        assert_eq!(summit.elevation(), 2472);
        let lon = (7.0 + 56.0 / 60.0 + 53.0 / 3600.0f64).to_radians();
        let lat = (46.0 + 35.0 / 60.0 + 33.0 / 3600.0f64).to_radians();
        assert!((summit.position().longitude() - lon).abs() < 1e-12);
        assert!((summit.position().latitude() - lat).abs() < 1e-12);
    }

    #[test]
    fn two_digit_longitude() {
        let summit = read_summit_line(" 10:01:02 46:00:00   812  H1 C02 D0 SOMEWHERE EAST", 1).unwrap();
        assert_eq!(summit.name(), "SOMEWHERE EAST");
        assert!((summit.position().longitude().to_degrees() - 10.0172).abs() < 1e-3);
    }

    #[test]
    fn malformed_lines_report_their_number() {
        assert!(matches!(read_summit_line("too short", 7), Err(PanoramaError::Gazetteer { line: 7, .. })));
        assert!(read_summit_line("  7:56:xx 46:35:33  2472  H1 C02 D0 LAUBERHORN", 1).is_err());
        assert!(read_summit_line("  7:56:53 46:35:33  2472  H1 C02 D0", 1).is_err());
        assert!(read_summit_line("  7:56:53 46:75:33  2472  H1 C02 D0 LAUBERHORN", 1).is_err());
    }

    #[test]
    fn strict_reader_fails_on_bad_line() {
        let text = format!("{LAUBERHORN}\nbroken\n{EIGER}\n");
        let err = read_summits(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, PanoramaError::Gazetteer { line: 2, .. }));
    }

    #[test]
    fn lenient_reader_skips_bad_lines() {
        let text = format!("{LAUBERHORN}\nbroken\n\n{EIGER}\n");
        let summits = read_summits_lenient(Cursor::new(text)).unwrap();
        let names: Vec<_> = summits.iter().map(Summit::name).collect();
        assert_eq!(names, ["LAUBERHORN", "EIGER"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(read_summits_from("/nonexistent/alps.txt"), Err(PanoramaError::Io(_))));
    }
}
