use serde::{Deserialize, Serialize};

use crate::geo::EARTH_RADIUS;
use crate::math::sq;

/// Standard atmospheric refraction coefficient for visible light.
pub const DEFAULT_REFRACTION_COEFFICIENT: f64 = 0.13;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefractionParams {
    pub coefficient: f64,
}

impl Default for RefractionParams {
    fn default() -> Self {
        Self { coefficient: DEFAULT_REFRACTION_COEFFICIENT }
    }
}

impl RefractionParams {
    /// Apparent drop of the ground below the tangent plane at arc length `d`,
    /// curvature reduced by refraction.
    pub fn curvature_drop(&self, d: f64) -> f64 {
        sq(d) * (1.0 - self.coefficient) / (2.0 * EARTH_RADIUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_at_ten_kilometres() {
        let drop = RefractionParams::default().curvature_drop(10_000.0);
        assert!((drop - 6.828).abs() < 1e-3);
        let no_refraction = RefractionParams { coefficient: 0.0 }.curvature_drop(10_000.0);
        assert!(no_refraction > drop);
    }
}
