pub mod gazetteer;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{check_argument, Result};
use crate::geo::GeoPoint;

/// A named summit, elevation in metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSummit")]
pub struct Summit {
    name: String,
    position: GeoPoint,
    elevation: i32,
}

#[derive(Deserialize)]
struct RawSummit {
    name: String,
    position: GeoPoint,
    elevation: i32,
}

impl TryFrom<RawSummit> for Summit {
    type Error = crate::error::PanoramaError;

    fn try_from(raw: RawSummit) -> Result<Self> {
        Summit::new(raw.name, raw.position, raw.elevation)
    }
}

impl Summit {
    pub fn new(name: impl Into<String>, position: GeoPoint, elevation: i32) -> Result<Self> {
        let name = name.into();
        check_argument(!name.is_empty(), "summit name is empty")?;
        check_argument(elevation >= 0, format!("negative elevation {elevation} for {name}"))?;
        Ok(Self { name, position, elevation })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> GeoPoint {
        self.position
    }

    pub fn elevation(&self) -> i32 {
        self.elevation
    }
}

impl fmt::Display for Summit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.position, self.elevation)
    }
}
