//! Bearings measured clockwise from north, as opposed to the counter-clockwise
//! angles expected by the trigonometric functions.

use std::f64::consts::PI;

use crate::error::{check_argument, Result};
use crate::math::PI2;

pub fn is_canonical(azimuth: f64) -> bool {
    (0.0..PI2).contains(&azimuth)
}

/// Reduces `azimuth` into `[0, 2π)`.
pub fn canonicalize(mut azimuth: f64) -> f64 {
    while azimuth >= PI2 {
        azimuth -= PI2;
    }
    while azimuth < 0.0 {
        azimuth += PI2;
    }
    // Adding 2π to a tiny negative value can round up to exactly 2π.
    if azimuth >= PI2 { 0.0 } else { azimuth }
}

pub fn to_math(azimuth: f64) -> Result<f64> {
    check_argument(is_canonical(azimuth), format!("azimuth {azimuth} is not canonical"))?;
    Ok(canonicalize(PI2 - azimuth))
}

pub fn from_math(angle: f64) -> Result<f64> {
    check_argument(is_canonical(angle), format!("angle {angle} is not canonical"))?;
    Ok(canonicalize(PI2 - angle))
}

/// `from_math` for callers that canonicalized the angle themselves.
pub(crate) fn from_math_unchecked(angle: f64) -> f64 {
    debug_assert!(is_canonical(angle));
    canonicalize(PI2 - angle)
}

/// Compass octant of `azimuth`, built from the four cardinal labels ("N", "NE", ...).
pub fn to_octant_string(azimuth: f64, n: &str, e: &str, s: &str, w: &str) -> Result<String> {
    check_argument(is_canonical(azimuth), format!("azimuth {azimuth} is not canonical"))?;
    let octants = [
        n.to_string(),
        format!("{n}{e}"),
        e.to_string(),
        format!("{s}{e}"),
        s.to_string(),
        format!("{s}{w}"),
        w.to_string(),
        format!("{n}{w}"),
    ];
    let index = ((azimuth + PI / 8.0) / (PI / 4.0)).floor() as usize % octants.len();
    Ok(octants[index].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_is_idempotent_and_bounded() {
        for a in [-20.0, -PI2, -1e-18, 0.0, 1.0, PI2, 3.0 * PI2 + 0.5, 100.0] {
            let c = canonicalize(a);
            assert!(is_canonical(c), "{a} -> {c}");
            assert_eq!(canonicalize(c), c);
        }
    }

    #[test]
    fn math_conversion_round_trips() {
        let a = 1.2;
        let m = to_math(a).unwrap();
        assert!((m - (PI2 - 1.2)).abs() < 1e-12);
        assert!((from_math(m).unwrap() - a).abs() < 1e-12);
        assert_eq!(to_math(0.0).unwrap(), 0.0);
    }

    #[test]
    fn conversions_reject_non_canonical() {
        assert!(to_math(-0.1).is_err());
        assert!(from_math(PI2).is_err());
    }

    #[test]
    fn octants() {
        let name = |a: f64| to_octant_string(a.to_radians(), "N", "E", "S", "W").unwrap();
        assert_eq!(name(0.0), "N");
        assert_eq!(name(350.0), "N");
        assert_eq!(name(45.0), "NE");
        assert_eq!(name(100.0), "E");
        assert_eq!(name(180.0), "S");
        assert_eq!(name(225.0), "SW");
        assert_eq!(name(300.0), "NW");
    }
}
