//! Closed integer ranges used to address DEM samples.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{check_argument, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval1D")]
pub struct Interval1D {
    from: i32,
    to: i32,
}

#[derive(Deserialize)]
struct RawInterval1D {
    from: i32,
    to: i32,
}

impl TryFrom<RawInterval1D> for Interval1D {
    type Error = crate::error::PanoramaError;

    fn try_from(raw: RawInterval1D) -> Result<Self> {
        Interval1D::new(raw.from, raw.to)
    }
}

impl Interval1D {
    pub fn new(included_from: i32, included_to: i32) -> Result<Self> {
        check_argument(
            included_from <= included_to,
            format!("empty interval [{included_from}..{included_to}]"),
        )?;
        Ok(Self { from: included_from, to: included_to })
    }

    pub fn included_from(&self) -> i32 {
        self.from
    }

    pub fn included_to(&self) -> i32 {
        self.to
    }

    pub fn contains(&self, v: i32) -> bool {
        (self.from..=self.to).contains(&v)
    }

    pub fn size(&self) -> u64 {
        (i64::from(self.to) - i64::from(self.from) + 1) as u64
    }

    pub fn size_of_intersection_with(&self, that: &Interval1D) -> u64 {
        let from = i64::from(self.from.max(that.from));
        let to = i64::from(self.to.min(that.to));
        (to - from + 1).max(0) as u64
    }

    pub fn bounding_union(&self, that: &Interval1D) -> Interval1D {
        Interval1D { from: self.from.min(that.from), to: self.to.max(that.to) }
    }

    /// True when the two intervals overlap or touch, so their union has no gap.
    pub fn is_unionable_with(&self, that: &Interval1D) -> bool {
        self.bounding_union(that).size() == self.size() + that.size() - self.size_of_intersection_with(that)
    }

    pub fn union(&self, that: &Interval1D) -> Result<Interval1D> {
        check_argument(self.is_unionable_with(that), format!("{self} and {that} are not unionable"))?;
        Ok(self.bounding_union(that))
    }
}

impl fmt::Display for Interval1D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}]", self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval2D {
    x: Interval1D,
    y: Interval1D,
}

impl Interval2D {
    pub fn new(x: Interval1D, y: Interval1D) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> Interval1D {
        self.x
    }

    pub fn y(&self) -> Interval1D {
        self.y
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x.contains(x) && self.y.contains(y)
    }

    pub fn size(&self) -> u64 {
        self.x.size() * self.y.size()
    }

    pub fn size_of_intersection_with(&self, that: &Interval2D) -> u64 {
        self.x.size_of_intersection_with(&that.x) * self.y.size_of_intersection_with(&that.y)
    }

    pub fn bounding_union(&self, that: &Interval2D) -> Interval2D {
        Interval2D { x: self.x.bounding_union(&that.x), y: self.y.bounding_union(&that.y) }
    }

    /// Axis-wise check. The union of two unionable rectangles may cover cells
    /// belonging to neither of them; DEM tiles are adjacent full rectangles, so
    /// this never matters in practice.
    pub fn is_unionable_with(&self, that: &Interval2D) -> bool {
        self.x.is_unionable_with(&that.x) && self.y.is_unionable_with(&that.y)
    }

    pub fn union(&self, that: &Interval2D) -> Result<Interval2D> {
        check_argument(self.is_unionable_with(that), format!("{self} and {that} are not unionable"))?;
        Ok(self.bounding_union(that))
    }
}

impl fmt::Display for Interval2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.x, self.y)
    }
}
