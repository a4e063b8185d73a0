//! Node headers.
//!
//! Every node of a structured archive is an Ogawa group whose first child is
//! a data block describing the node:
//!
//! ```text
//! u8        kind (0 = group, 1 = array)
//! u32       name length, followed by UTF-8 name bytes
//! -- arrays only --
//! u8        element type tag
//! u8        rank
//! u64 * r   dimension sizes
//! ```
//!
//! Array nodes carry their payload as the second child; group nodes list
//! their member nodes after the header.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::util::{Dimensions, ElementType, Error, Result};

/// Kind of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeKind {
    Group = 0,
    Array = 1,
}

/// Decoded node header.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeHeader {
    pub kind: NodeKind,
    pub name: String,
    pub element_type: ElementType,
    pub dims: Dimensions,
}

impl NodeHeader {
    /// Header of a group node.
    pub fn group(name: &str) -> Self {
        Self {
            kind: NodeKind::Group,
            name: name.to_string(),
            element_type: ElementType::Unknown,
            dims: Dimensions::scalar(),
        }
    }

    /// Header of an array node.
    pub fn array(name: &str, element_type: ElementType, dims: Dimensions) -> Self {
        Self {
            kind: NodeKind::Array,
            name: name.to_string(),
            element_type,
            dims,
        }
    }

    /// Serialize to the on-disk layout.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(16 + self.name.len() + 8 * self.dims.rank());
        buf.write_u8(self.kind as u8)?;
        buf.write_u32::<LittleEndian>(self.name.len() as u32)?;
        buf.extend_from_slice(self.name.as_bytes());

        if self.kind == NodeKind::Array {
            let rank = u8::try_from(self.dims.rank())
                .map_err(|_| Error::WriteFailed(format!("rank of '{}' too large", self.name)))?;
            buf.write_u8(self.element_type as u8)?;
            buf.write_u8(rank)?;
            for &size in self.dims.sizes() {
                buf.write_u64::<LittleEndian>(size as u64)?;
            }
        }
        Ok(buf)
    }

    /// Parse from the on-disk layout.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(bytes);
        let truncated = |_| Error::invalid("truncated node header");

        let kind = match cur.read_u8().map_err(truncated)? {
            0 => NodeKind::Group,
            1 => NodeKind::Array,
            k => return Err(Error::invalid(format!("unknown node kind {}", k))),
        };

        let name_len = cur.read_u32::<LittleEndian>().map_err(truncated)? as usize;
        let start = cur.position() as usize;
        let end = start
            .checked_add(name_len)
            .filter(|&end| end <= bytes.len())
            .ok_or_else(|| Error::invalid("truncated node name"))?;
        let name = String::from_utf8(bytes[start..end].to_vec())?;
        cur.set_position(end as u64);

        if kind == NodeKind::Group {
            return Ok(Self::group(&name));
        }

        let element_type = ElementType::from_u8(cur.read_u8().map_err(truncated)?);
        if element_type == ElementType::Unknown {
            return Err(Error::invalid(format!("unknown element type in node '{}'", name)));
        }
        let rank = cur.read_u8().map_err(truncated)? as usize;
        let mut sizes = Vec::with_capacity(rank);
        for _ in 0..rank {
            let size = cur.read_u64::<LittleEndian>().map_err(truncated)?;
            let size = usize::try_from(size)
                .map_err(|_| Error::invalid(format!("dimension of '{}' too large", name)))?;
            sizes.push(size);
        }

        Ok(Self::array(&name, element_type, sizes.into()))
    }
}
