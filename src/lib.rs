//! # GeoData
//!
//! Container for geophysical sensor measurements: named value arrays on a
//! set of sample locations over a time axis, tagged with the coordinate
//! system of the locations and the position of the sensor.
//!
//! Containers can be sliced in time, re-sampled onto new locations
//! (optionally in another coordinate system) and persisted to a
//! self-describing hierarchical archive.
//!
//! ## Modules
//!
//! - [`util`] - Errors, element types, shapes
//! - [`ogawa`] - Low-level hierarchical binary container
//! - [`core`] - Numeric arrays and loosely typed fields
//! - [`serialize`] - Named array trees on top of Ogawa
//! - [`coords`] - Coordinate systems and conversions
//! - [`interp`] - Scattered-data interpolation
//! - [`geodata`] - The [`GeoData`] container
//!
//! ## Example
//!
//! ```ignore
//! use geodata::prelude::*;
//!
//! let gd = GeoData::read_h5("scan.geo")?;
//! let first = gd.timeslice(&TimeSelector::Array(vec![0]))?;
//! let grid = first.interpolate(points.view(), &CoordinateSystem::Cartesian, Method::Linear, f64::NAN)?;
//! grid.write_h5("grid.geo")?;
//! ```

pub mod util;
pub mod ogawa;
pub mod core;
pub mod serialize;
pub mod coords;
pub mod interp;
pub mod geodata;

// Re-export commonly used types
pub use util::{Error, Result};
pub use crate::core::{is_numeric, Field, NumericArray};
pub use coords::CoordinateSystem;
pub use interp::Method;
pub use geodata::{read_h5_main, GeoData, TimeSelector};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::core::{Field, NumericArray};
    pub use crate::coords::CoordinateSystem;
    pub use crate::interp::Method;
    pub use crate::geodata::{read_h5_main, GeoData, TimeSelector};
}
