use std::f64::consts::PI;

use crate::error::{check_argument, Result};

pub const PI2: f64 = 2.0 * PI;

#[inline]
pub fn sq(x: f64) -> f64 {
    x * x
}

/// Floating point modulo whose result takes the sign of `y`.
#[inline]
pub fn floor_mod(x: f64, y: f64) -> f64 {
    x - y * (x / y).floor()
}

#[inline]
pub fn haversin(x: f64) -> f64 {
    sq((x / 2.0).sin())
}

/// Signed shortest angle from `a1` to `a2`, in `[-π, π)`.
pub fn angular_distance(a1: f64, a2: f64) -> f64 {
    floor_mod(a2 - a1 + PI, PI2) - PI
}

#[inline]
pub fn lerp(y0: f64, y1: f64, x: f64) -> f64 {
    (y1 - y0) * x + y0
}

pub fn bilerp(z00: f64, z10: f64, z01: f64, z11: f64, x: f64, y: f64) -> f64 {
    lerp(lerp(z00, z10, x), lerp(z01, z11, x), y)
}

/// Scans `f` from `min_x` in steps of `dx` and returns the lower bound of the
/// first interval `[x, x + dx]` on which `f` changes sign, or `+∞` when no
/// such interval exists below `max_x`.
pub fn first_interval_containing_root<F>(f: F, min_x: f64, max_x: f64, dx: f64) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    check_argument(min_x <= max_x, "root search range is empty")?;
    check_argument(dx > 0.0, "root search step must be positive")?;

    // Stepping by index keeps the grid exact over long scans.
    let mut lower = min_x;
    let mut value_at_lower = f(lower);
    let mut k = 1u64;
    while min_x + k as f64 * dx <= max_x {
        let upper = min_x + k as f64 * dx;
        let value_at_upper = f(upper);
        if value_at_lower * value_at_upper <= 0.0 {
            return Ok(lower);
        }
        lower = upper;
        value_at_lower = value_at_upper;
        k += 1;
    }
    Ok(f64::INFINITY)
}

/// Narrows the bracket `[x1, x2]` around a root of `f` by bisection until it is
/// at most `epsilon` wide, returning its lower bound.
pub fn improve_root<F>(f: F, x1: f64, x2: f64, epsilon: f64) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = (x1, x2);
    let mut f_lo = f(lo);
    let f_hi = f(hi);
    check_argument(f_lo * f_hi <= 0.0, "interval does not bracket a root")?;
    check_argument(epsilon > 0.0, "epsilon must be positive")?;

    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }

    while (hi - lo).abs() > epsilon {
        let mid = (lo + hi) / 2.0;
        let f_mid = f(mid);
        if f_mid == 0.0 {
            return Ok(mid);
        }
        if f_mid * f_lo < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }
    Ok(lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angular_distance_wraps() {
        assert!((angular_distance(0.1, PI2 - 0.1) + 0.2).abs() < 1e-12);
        assert!((angular_distance(PI2 - 0.1, 0.1) - 0.2).abs() < 1e-12);
        assert!((angular_distance(0.0, PI) + PI).abs() < 1e-12);
    }

    #[test]
    fn bilerp_at_corners_returns_samples() {
        assert_eq!(bilerp(1.0, 2.0, 3.0, 4.0, 0.0, 0.0), 1.0);
        assert_eq!(bilerp(1.0, 2.0, 3.0, 4.0, 1.0, 0.0), 2.0);
        assert_eq!(bilerp(1.0, 2.0, 3.0, 4.0, 0.0, 1.0), 3.0);
        assert_eq!(bilerp(1.0, 2.0, 3.0, 4.0, 1.0, 1.0), 4.0);
        assert!((bilerp(1.0, 2.0, 3.0, 4.0, 0.5, 0.5) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn first_interval_brackets_single_crossing() {
        let root = first_interval_containing_root(|x| x - 130.0, 0.0, 1000.0, 64.0).unwrap();
        assert_eq!(root, 128.0);
    }

    #[test]
    fn first_interval_without_crossing_is_infinite() {
        let root = first_interval_containing_root(|x| x + 1.0, 0.0, 1000.0, 64.0).unwrap();
        assert!(root.is_infinite());
    }

    #[test]
    fn first_interval_rejects_bad_ranges() {
        assert!(first_interval_containing_root(|x| x, 10.0, 0.0, 1.0).is_err());
        assert!(first_interval_containing_root(|x| x, 0.0, 10.0, 0.0).is_err());
    }

    #[test]
    fn improve_root_converges() {
        let root = improve_root(|x| x * x - 2.0, 1.0, 2.0, 1e-9).unwrap();
        assert!((root - 2f64.sqrt()).abs() < 1e-8);
        assert!(root <= 2f64.sqrt());
    }

    #[test]
    fn improve_root_returns_exact_endpoint() {
        assert_eq!(improve_root(|x| x - 1.0, 1.0, 3.0, 1e-3).unwrap(), 1.0);
        assert_eq!(improve_root(|x| x - 3.0, 1.0, 3.0, 1e-3).unwrap(), 3.0);
    }

    #[test]
    fn improve_root_requires_bracket() {
        assert!(improve_root(|x| x * x + 1.0, -1.0, 1.0, 1e-3).is_err());
    }
}
