//! Ogawa container writer.
//!
//! Data blocks and groups are appended bottom-up: children are written
//! before the group that lists them, and the root position is patched into
//! the header when the archive is finished.

mod stream;
mod archive;

pub use archive::OArchive;
pub use stream::OStream;
