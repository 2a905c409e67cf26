pub mod config;
pub mod error;
pub mod geo;
pub mod interval;
pub mod io;
pub mod labels;
pub mod math;
pub mod panorama;
pub mod physics;
pub mod summit;
pub mod terrain;

pub use error::{PanoramaError, Result};
