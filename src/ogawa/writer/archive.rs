//! Archive writer (core write path).

use std::path::Path;

use super::stream::OStream;
use crate::ogawa::format::*;
use crate::util::{Error, Result};

/// Ogawa archive writer.
///
/// The header is written with the frozen flag cleared; [`OArchive::finish`]
/// sets it once the root group exists. An archive dropped before `finish`
/// is closed but stays unfrozen, and readers reject it.
pub struct OArchive {
    name: String,
    stream: OStream,
    frozen: bool,
}

impl OArchive {
    /// Create a new archive file for writing.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let name = path.as_ref().to_string_lossy().to_string();
        let mut stream = OStream::create(&path)?;

        stream.write_bytes(OGAWA_MAGIC)?;
        stream.write_u8(NOT_FROZEN_FLAG)?;
        stream.write_u16(CURRENT_VERSION)?;
        stream.write_u64(0)?; // Root position placeholder.

        Ok(Self { name, stream, frozen: false })
    }

    /// Get the archive name/path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if the archive has been frozen (finalized).
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Write raw data block and return its position (0 for empty data).
    pub fn write_data(&mut self, data: &[u8]) -> Result<u64> {
        if self.frozen {
            return Err(Error::Frozen);
        }
        if data.is_empty() {
            return Ok(0);
        }

        let pos = self.stream.pos();
        self.stream.write_u64(data.len() as u64)?;
        self.stream.write_bytes(data)?;
        Ok(pos)
    }

    /// Write a group of already flagged child offsets and return its position.
    pub fn write_group(&mut self, children: &[u64]) -> Result<u64> {
        if self.frozen {
            return Err(Error::Frozen);
        }
        if children.is_empty() {
            return Ok(0);
        }

        let pos = self.stream.pos();
        self.stream.write_u64(children.len() as u64)?;
        for &child in children {
            self.stream.write_u64(child)?;
        }
        Ok(pos)
    }

    /// Patch the root position into the header, set the frozen flag and flush.
    pub fn finish(mut self, root_pos: u64) -> Result<()> {
        if self.frozen {
            return Err(Error::Frozen);
        }

        self.stream.seek(ROOT_POS_OFFSET as u64)?;
        self.stream.write_u64(root_pos)?;
        self.stream.seek(FROZEN_OFFSET as u64)?;
        self.stream.write_u8(FROZEN_FLAG)?;
        self.stream.seek_end()?;
        self.stream.flush()?;
        self.frozen = true;

        tracing::trace!(archive = %self.name, root_pos, "archive finalized");
        Ok(())
    }
}
