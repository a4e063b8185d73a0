//! Low-level Ogawa binary container.
//!
//! Ogawa is a minimal hierarchical container: every node is either a group
//! (a counted list of child offsets) or a data block (size-prefixed bytes).
//! Names, element types and shapes are layered on top by [`crate::serialize`].
//!
//! ## File Structure
//!
//! ```text
//! +------------------+
//! | Magic: "Ogawa"   |  5 bytes
//! +------------------+
//! | Frozen flag      |  1 byte (0x00 or 0xFF)
//! +------------------+
//! | Version          |  2 bytes (u16 LE)
//! +------------------+
//! | Root Group Pos   |  8 bytes (u64 LE)
//! +------------------+
//! | ... Data ...     |
//! +------------------+
//! ```

mod format;
mod reader;
pub mod writer;

pub use format::*;
pub use reader::*;
pub use writer::*;
