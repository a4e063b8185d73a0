//! Structured archive writer.

use std::path::Path;

use super::header::NodeHeader;
use super::payload::encode_array;
use crate::core::{Field, NumericArray};
use crate::ogawa::{make_data_offset, make_group_offset, OArchive};
use crate::util::{Dimensions, ElementType, Error, Result};

/// A borrowed node to be written.
///
/// A `Group` may only appear at the top level; its members must be arrays
/// or text.
#[derive(Clone, Debug)]
pub enum NodeRef<'a> {
    Array(&'a NumericArray),
    Text(&'a str),
    Group(Vec<(&'a str, NodeRef<'a>)>),
}

impl<'a> From<&'a Field> for NodeRef<'a> {
    fn from(field: &'a Field) -> Self {
        match field {
            Field::Array(a) => NodeRef::Array(a),
            Field::Text(s) => NodeRef::Text(s),
            Field::Group(g) => NodeRef::Group(g.iter().map(|(k, v)| (k.as_str(), NodeRef::from(v))).collect()),
        }
    }
}

/// Write `nodes` as the top-level members of a new archive at `path`.
///
/// Plain nodes become root-level arrays, groups become root-level groups
/// holding one array per member. The archive is finalized only if every
/// node was written; on failure the file is closed, left unfinalized, and
/// the error returned.
pub fn write_nodes(path: impl AsRef<Path>, nodes: &[(&str, NodeRef<'_>)]) -> Result<()> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), nodes = nodes.len(), "writing structured archive");

    let mut archive = OArchive::create(path)?;
    let mut children = Vec::with_capacity(nodes.len() + 1);
    let header = NodeHeader::group("").encode()?;
    children.push(make_data_offset(archive.write_data(&header)?));

    for (name, node) in nodes {
        children.push(make_group_offset(write_node(&mut archive, name, node, "")?));
    }

    let root = archive.write_group(&children)?;
    archive.finish(root)
}

fn write_node(archive: &mut OArchive, name: &str, node: &NodeRef<'_>, parent: &str) -> Result<u64> {
    if name.is_empty() || name.contains('/') {
        return Err(Error::WriteFailed(format!("invalid node name '{}' under '{}/'", name, parent)));
    }
    tracing::trace!(node = %format!("{}/{}", parent, name), "writing node");

    let children = match node {
        NodeRef::Array(array) => {
            let header = NodeHeader::array(name, array.element_type(), Dimensions::from_slice(array.shape()));
            let header_pos = archive.write_data(&header.encode()?)?;
            let payload_pos = archive.write_data(&encode_array(array))?;
            vec![make_data_offset(header_pos), make_data_offset(payload_pos)]
        }
        NodeRef::Text(text) => {
            if text.contains('\0') {
                return Err(Error::WriteFailed(format!("text node '{}/{}' contains a NUL byte", parent, name)));
            }
            let header = NodeHeader::array(name, ElementType::Char, Dimensions::d1(text.len()));
            let header_pos = archive.write_data(&header.encode()?)?;
            let payload_pos = archive.write_data(text.as_bytes())?;
            vec![make_data_offset(header_pos), make_data_offset(payload_pos)]
        }
        NodeRef::Group(members) => {
            if !parent.is_empty() {
                return Err(Error::WriteFailed(format!(
                    "nested group '{}/{}': only one level of groups is supported",
                    parent, name
                )));
            }
            let header_pos = archive.write_data(&NodeHeader::group(name).encode()?)?;
            let mut children = vec![make_data_offset(header_pos)];
            let path = format!("/{}", name);
            for (member, node) in members {
                children.push(make_group_offset(write_node(archive, member, node, &path)?));
            }
            children
        }
    };

    archive.write_group(&children)
}
