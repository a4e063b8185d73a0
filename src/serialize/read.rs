//! Structured archive reader.

use std::collections::BTreeMap;
use std::path::Path;

use super::header::{NodeHeader, NodeKind};
use super::payload::decode_payload;
use crate::core::Field;
use crate::ogawa::{IArchive, IGroup};
use crate::util::{Error, Result};

/// One group found while walking an archive, with its leaf arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupEntry {
    /// Absolute path, `/` for the root.
    pub path: String,
    /// Leaf arrays of this group by name (text leaves already coerced).
    pub leaves: BTreeMap<String, Field>,
}

impl GroupEntry {
    /// Path components, empty for the root.
    pub fn components(&self) -> Vec<&str> {
        self.path.split('/').filter(|c| !c.is_empty()).collect()
    }
}

/// Every group of an archive, in depth-first (pre-order) walk order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hierarchy {
    groups: Vec<GroupEntry>,
}

impl Hierarchy {
    /// Read and walk the archive at `path`.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_opts(path, cfg!(feature = "mmap"))
    }

    /// Read and walk the archive, choosing between mmap and buffered reads.
    pub fn read_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let archive = IArchive::open_opts(path, use_mmap)?;
        let root = archive.root();

        let header = read_header(root)?;
        if header.kind != NodeKind::Group {
            return Err(Error::invalid("root node is not a group"));
        }

        let mut hierarchy = Self::default();
        hierarchy.walk(root, "/".to_string())?;

        tracing::debug!(path = %path.display(), groups = hierarchy.groups.len(), "read structured archive");
        Ok(hierarchy)
    }

    fn walk(&mut self, group: &IGroup, path: String) -> Result<()> {
        let mut leaves = BTreeMap::new();
        let mut subgroups = Vec::new();

        for index in 1..group.num_children() {
            let node = group.group(index)?;
            let header = read_header(&node)?;
            match header.kind {
                NodeKind::Array => {
                    let bytes = node.data(1)?.read_all()?;
                    let field = decode_payload(&header.name, header.element_type, &header.dims, &bytes)?;
                    leaves.insert(header.name, field);
                }
                NodeKind::Group => subgroups.push((header.name, node)),
            }
        }

        self.groups.push(GroupEntry { path: path.clone(), leaves });

        for (name, node) in subgroups {
            let child_path = if path == "/" {
                format!("/{}", name)
            } else {
                format!("{}/{}", path, name)
            };
            self.walk(&node, child_path)?;
        }
        Ok(())
    }

    /// All groups in walk order.
    pub fn groups(&self) -> &[GroupEntry] {
        &self.groups
    }

    /// The root group.
    pub fn root(&self) -> Option<&GroupEntry> {
        self.groups.iter().find(|g| g.path == "/")
    }

    /// The top-level group whose last path component is `name`.
    pub fn top_level_group(&self, name: &str) -> Option<&GroupEntry> {
        self.groups.iter().find(|g| {
            let parts = g.components();
            parts.len() == 1 && parts[0] == name
        })
    }

    /// Resolve a named field.
    ///
    /// A top-level group of that name wins and yields the whole mapping
    /// found under it; otherwise a root-level leaf of that name is returned.
    pub fn field(&self, name: &str) -> Option<Field> {
        if let Some(group) = self.top_level_group(name) {
            return Some(Field::Group(group.leaves.clone()));
        }
        self.root().and_then(|root| root.leaves.get(name).cloned())
    }

    /// Resolve `names` in order, silently omitting any that are absent.
    ///
    /// Callers relying on positional alignment with `names` must check the
    /// returned length.
    pub fn fields(&self, names: &[&str]) -> Vec<Field> {
        names
            .iter()
            .filter_map(|name| {
                let field = self.field(name);
                if field.is_none() {
                    tracing::debug!(field = *name, "field absent from archive, omitted");
                }
                field
            })
            .collect()
    }
}

fn read_header(group: &IGroup) -> Result<NodeHeader> {
    if group.is_empty() {
        return Err(Error::invalid(format!("node at {} has no header", group.pos())));
    }
    NodeHeader::decode(&group.data(0)?.read_all()?)
}
