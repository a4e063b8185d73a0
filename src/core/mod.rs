//! Core value types shared by the container, the serializer and readers.
//!
//! - [`NumericArray`] - the closed set of numeric array variants
//! - [`Field`] - loosely typed reader output (array, text or group)
//! - [`is_numeric`] - the numeric predicate used during validation

mod array;
mod field;

pub use array::*;
pub use field::*;
