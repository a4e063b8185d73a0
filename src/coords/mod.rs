//! Coordinate systems and the point-array transforms between them.
//!
//! - [`CoordinateSystem`] - the open set of coordinate-system tags
//! - [`to_cartesian`] / [`to_spherical`] - row-wise point conversions
//! - [`convert`] - dispatch on a (from, to) pair

mod system;
mod transform;

pub use system::*;
pub use transform::*;
