//! Utility types and functions for geodata.
//!
//! This module contains fundamental types used throughout the library:
//! - [`ElementType`] - Storage type of array payloads
//! - [`Dimensions`] - Array shapes as stored on disk
//! - [`Error`] / [`Result`] - Error handling

mod element;
mod error;
mod dimensions;

pub use element::*;
pub use error::*;
pub use dimensions::*;
