//! Reading and writing containers as structured archives.
//!
//! The `_h5` names are kept for the container's public API, but the files
//! are Ogawa archives (see [`crate::ogawa`]), not HDF5. HDF5 files such as
//! instrument `.h5` exports are rejected with [`crate::Error::InvalidMagic`].

use std::path::Path;

use super::{CanonicalMember, GeoData, CANONICAL_FIELDS, CANONICAL_NAMES};
use crate::core::Field;
use crate::serialize::{write_nodes, Hierarchy, NodeRef};
use crate::util::Result;

/// Read the canonical fields of the archive at `path`, in canonical order.
///
/// `path` must be an Ogawa archive written by [`GeoData::write_h5`] or
/// [`crate::serialize::write_nodes`]; HDF5 input is not supported.
///
/// Fields missing from the archive are left out of the result, so entries
/// after a gap shift position; [`GeoData::from_fields`] reports a short
/// record as [`crate::Error::PartialRecord`].
pub fn read_h5_main(path: impl AsRef<Path>) -> Result<Vec<Field>> {
    Ok(Hierarchy::read(path)?.fields(&CANONICAL_NAMES))
}

impl GeoData {
    /// Write the container to `path` as an Ogawa archive (not HDF5); the
    /// five canonical fields first, followed by the extra attributes.
    pub fn write_h5(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut nodes: Vec<(&str, NodeRef<'_>)> = CANONICAL_FIELDS
            .iter()
            .map(|&(name, member)| (name, self.canonical_node(member)))
            .collect();
        nodes.extend(
            self.attributes
                .iter()
                .map(|(name, value)| (name.as_str(), NodeRef::Array(value))),
        );
        write_nodes(path, &nodes)
    }

    /// Read a container written by [`GeoData::write_h5`], extra attributes
    /// included.
    pub fn read_h5(path: impl AsRef<Path>) -> Result<GeoData> {
        let hierarchy = Hierarchy::read(path)?;
        let mut gd = GeoData::new(|h: &Hierarchy| Ok(h.fields(&CANONICAL_NAMES)), &hierarchy)?;

        if let Some(root) = hierarchy.root() {
            for (name, leaf) in &root.leaves {
                if CANONICAL_NAMES.contains(&name.as_str()) {
                    continue;
                }
                match leaf {
                    Field::Array(value) => {
                        gd.attributes.insert(name.clone(), value.clone());
                    }
                    other => tracing::debug!(attribute = %name, kind = other.kind_name(), "skipping non-numeric attribute"),
                }
            }
        }
        Ok(gd)
    }

    fn canonical_node(&self, member: CanonicalMember) -> NodeRef<'_> {
        match member {
            CanonicalMember::Values => NodeRef::Group(
                self.values
                    .iter()
                    .map(|(key, array)| (key.as_str(), NodeRef::Array(array)))
                    .collect(),
            ),
            CanonicalMember::CoordinateSystem => NodeRef::Text(self.coordinate_system.as_str()),
            CanonicalMember::SampleLocations => NodeRef::Array(&self.sample_locations),
            CanonicalMember::SensorLocation => NodeRef::Array(&self.sensor_location),
            CanonicalMember::Times => NodeRef::Array(&self.times),
        }
    }
}
