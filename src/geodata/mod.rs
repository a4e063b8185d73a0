//! The geophysical data container.
//!
//! A [`GeoData`] couples named measurement arrays shaped
//! `(num_locations, num_times)` to the sample locations they were taken
//! at, the coordinate system those locations are expressed in, the
//! sensor's own position and the time axis.
//!
//! Containers are built either from a reader adapter returning the five
//! canonical fields (see [`GeoData::new`]) or directly from typed parts
//! ([`GeoData::from_parts`]). Both paths validate types and shapes before
//! anything is stored.

mod interpolate;
mod io;
mod timeslice;

use std::collections::BTreeMap;

use crate::coords::CoordinateSystem;
use crate::core::{Field, NumericArray};
use crate::util::{Error, Result};

pub use io::read_h5_main;
pub use timeslice::TimeSelector;

/// How a canonical field is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Mapping of name to array, stored as a group.
    Dictionary,
    /// Character string, stored as a char array.
    Text,
    /// Plain numeric array.
    Array,
}

/// The container member a canonical field is read into and written from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanonicalMember {
    Values,
    CoordinateSystem,
    SampleLocations,
    SensorLocation,
    Times,
}

impl CanonicalMember {
    /// How the member is stored.
    pub fn kind(self) -> FieldKind {
        match self {
            Self::Values => FieldKind::Dictionary,
            Self::CoordinateSystem => FieldKind::Text,
            Self::SampleLocations | Self::SensorLocation | Self::Times => FieldKind::Array,
        }
    }
}

/// The canonical fields in their fixed order.
pub const CANONICAL_FIELDS: [(&str, CanonicalMember); 5] = [
    ("data", CanonicalMember::Values),
    ("coordnames", CanonicalMember::CoordinateSystem),
    ("dataloc", CanonicalMember::SampleLocations),
    ("sensorloc", CanonicalMember::SensorLocation),
    ("times", CanonicalMember::Times),
];

/// Names of [`CANONICAL_FIELDS`], in order.
pub const CANONICAL_NAMES: [&str; 5] = ["data", "coordnames", "dataloc", "sensorloc", "times"];

/// Geophysical measurements on a set of sample locations over time.
#[derive(Clone, Debug)]
pub struct GeoData {
    values: BTreeMap<String, NumericArray>,
    coordinate_system: CoordinateSystem,
    sample_locations: NumericArray,
    sensor_location: NumericArray,
    times: NumericArray,
    attributes: BTreeMap<String, NumericArray>,
}

impl GeoData {
    /// Build a container from a reader adapter.
    ///
    /// `reader(inputs)` must return the canonical fields in order:
    /// a group of numeric arrays, a text tag, then three numeric arrays.
    pub fn new<I, F>(reader: F, inputs: I) -> Result<Self>
    where
        F: FnOnce(I) -> Result<Vec<Field>>,
    {
        Self::from_fields(reader(inputs)?)
    }

    /// Build a container from the canonical fields, in order.
    pub fn from_fields(fields: Vec<Field>) -> Result<Self> {
        let expected = CANONICAL_FIELDS.len();
        let found = fields.len();
        let [data, coordnames, dataloc, sensorloc, times]: [Field; 5] = fields.try_into().map_err(|_| {
            if found < expected {
                Error::PartialRecord { expected, found }
            } else {
                Error::validation(format!("reader returned {} fields, expected {}", found, expected))
            }
        })?;

        let values = match data {
            Field::Group(members) => members
                .into_iter()
                .map(|(name, member)| match member {
                    Field::Array(a) => Ok((name, a)),
                    other => Err(Error::validation(format!(
                        "data['{}'] needs to be a numeric array, got {}",
                        name,
                        other.kind_name()
                    ))),
                })
                .collect::<Result<BTreeMap<_, _>>>()?,
            other => {
                return Err(Error::validation(format!(
                    "data needs to be a dictionary, got {}",
                    other.kind_name()
                )))
            }
        };

        let coordinate_system = match coordnames {
            Field::Text(tag) => tag,
            other => {
                return Err(Error::validation(format!(
                    "coordnames needs to be a string, got {}",
                    other.kind_name()
                )))
            }
        };

        let sample_locations = numeric(dataloc, "dataloc")?;
        let sensor_location = numeric(sensorloc, "sensorloc")?;
        let times = numeric(times, "times")?;

        Self::from_parts(
            values,
            coordinate_system.as_str(),
            sample_locations,
            sensor_location,
            times,
        )
    }

    /// Build a container from typed parts.
    ///
    /// Fails unless `sample_locations` is 2-D, `times` is 1-D or 2-D, every
    /// value array is shaped `(num_locations, num_times)` and the
    /// coordinate system tag is non-empty.
    pub fn from_parts(
        values: BTreeMap<String, NumericArray>,
        coordinate_system: impl Into<CoordinateSystem>,
        sample_locations: NumericArray,
        sensor_location: NumericArray,
        times: NumericArray,
    ) -> Result<Self> {
        let coordinate_system = coordinate_system.into();
        if coordinate_system.as_str().is_empty() {
            return Err(Error::validation("coordnames needs to be a non-empty string"));
        }
        if sample_locations.ndim() != 2 {
            return Err(Error::shape(
                "dataloc",
                "(num_locations, num_axes)",
                format!("{:?}", sample_locations.shape()),
            ));
        }
        if !matches!(times.ndim(), 1 | 2) {
            return Err(Error::shape(
                "times",
                "(num_times,) or (num_times, 2)",
                format!("{:?}", times.shape()),
            ));
        }

        let expected = [sample_locations.shape()[0], times.shape()[0]];
        for (name, array) in &values {
            if array.shape() != expected {
                return Err(Error::shape(
                    &format!("data['{}']", name),
                    format!("{:?}", expected),
                    format!("{:?}", array.shape()),
                ));
            }
        }

        tracing::debug!(
            fields = values.len(),
            locations = expected[0],
            times = expected[1],
            coords = %coordinate_system,
            "constructed container"
        );
        Ok(Self {
            values,
            coordinate_system,
            sample_locations,
            sensor_location,
            times,
            attributes: BTreeMap::new(),
        })
    }

    /// Attach an extra plain attribute, persisted alongside the canonical
    /// fields. Canonical names are rejected.
    pub fn with_attribute(mut self, name: impl Into<String>, value: NumericArray) -> Result<Self> {
        let name = name.into();
        if CANONICAL_NAMES.contains(&name.as_str()) {
            return Err(Error::validation(format!(
                "'{}' is a canonical field and cannot be an attribute",
                name
            )));
        }
        self.attributes.insert(name, value);
        Ok(self)
    }

    /// Names of the value fields.
    pub fn datanames(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    /// All value fields by name.
    pub fn values(&self) -> &BTreeMap<String, NumericArray> {
        &self.values
    }

    /// One value field.
    pub fn value(&self, name: &str) -> Option<&NumericArray> {
        self.values.get(name)
    }

    /// Coordinate system of the sample locations.
    pub fn coordinate_system(&self) -> &CoordinateSystem {
        &self.coordinate_system
    }

    /// Sample locations, one row per location.
    pub fn sample_locations(&self) -> &NumericArray {
        &self.sample_locations
    }

    /// Reference position of the sensor.
    pub fn sensor_location(&self) -> &NumericArray {
        &self.sensor_location
    }

    /// Time axis, one entry (or start/end row) per time bin.
    pub fn times(&self) -> &NumericArray {
        &self.times
    }

    /// Extra plain attributes.
    pub fn attributes(&self) -> &BTreeMap<String, NumericArray> {
        &self.attributes
    }

    /// Number of sample locations.
    pub fn num_locations(&self) -> usize {
        self.sample_locations.shape()[0]
    }

    /// Number of time bins.
    pub fn num_times(&self) -> usize {
        self.times.shape()[0]
    }
}

fn numeric(field: Field, name: &str) -> Result<NumericArray> {
    match field {
        Field::Array(a) => Ok(a),
        other => Err(Error::validation(format!(
            "{} needs to be a numeric array, got {}",
            name,
            other.kind_name()
        ))),
    }
}

/// NaN-masked equality over the canonical fields.
///
/// Positions holding NaN on either side are ignored. Extra attributes do
/// not take part.
impl PartialEq for GeoData {
    fn eq(&self, other: &Self) -> bool {
        if self.values.len() != other.values.len() {
            return false;
        }
        for (name, a) in &self.values {
            match other.values.get(name) {
                Some(b) if a.nan_masked_eq(b) => {}
                _ => return false,
            }
        }

        self.coordinate_system == other.coordinate_system
            && self.sample_locations.nan_masked_eq(&other.sample_locations)
            && self.sensor_location.nan_masked_eq(&other.sensor_location)
            && self.times.nan_masked_eq(&other.times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2, Array2};

    fn parts() -> (BTreeMap<String, NumericArray>, NumericArray, NumericArray, NumericArray) {
        let mut values = BTreeMap::new();
        values.insert("ne".to_string(), NumericArray::from(Array2::<f64>::ones((3, 2))));
        let locs = NumericArray::from(arr2(&[[0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 0.0, 1.0]]));
        let sensor = NumericArray::from(arr1(&[65.0, -147.0, 0.2]));
        let times = NumericArray::from(arr2(&[[0i64, 10], [10, 20]]));
        (values, locs, sensor, times)
    }

    #[test]
    fn test_canonical_descriptors() {
        let names: Vec<&str> = CANONICAL_FIELDS.iter().map(|&(name, _)| name).collect();
        assert_eq!(names, CANONICAL_NAMES);
        let kinds: Vec<FieldKind> = CANONICAL_FIELDS.iter().map(|&(_, member)| member.kind()).collect();
        assert_eq!(
            kinds,
            vec![FieldKind::Dictionary, FieldKind::Text, FieldKind::Array, FieldKind::Array, FieldKind::Array]
        );
    }

    #[test]
    fn test_from_parts() {
        let (values, locs, sensor, times) = parts();
        let gd = GeoData::from_parts(values, "Cartesian", locs, sensor, times).unwrap();
        assert_eq!(gd.datanames(), vec!["ne"]);
        assert_eq!(gd.num_locations(), 3);
        assert_eq!(gd.num_times(), 2);
        assert_eq!(gd.coordinate_system(), &CoordinateSystem::Cartesian);
    }

    #[test]
    fn test_shape_checks() {
        let (mut values, locs, sensor, times) = parts();
        values.insert("te".to_string(), NumericArray::from(Array2::<f64>::ones((3, 3))));
        let err = GeoData::from_parts(values, "Cartesian", locs.clone(), sensor.clone(), times.clone()).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { ref field, .. } if field == "data['te']"));

        let (values, _, _, _) = parts();
        let flat = NumericArray::from(arr1(&[0.0, 1.0, 2.0]));
        let err = GeoData::from_parts(values, "Cartesian", flat, sensor.clone(), times.clone()).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { ref field, .. } if field == "dataloc"));

        let (values, _, _, _) = parts();
        assert!(matches!(
            GeoData::from_parts(values, "", locs, sensor, times),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_attributes() {
        let (values, locs, sensor, times) = parts();
        let gd = GeoData::from_parts(values, "Cartesian", locs, sensor, times).unwrap();
        let gd = gd.with_attribute("range_gate", arr1(&[1.5]).into()).unwrap();
        assert!(gd.attributes().contains_key("range_gate"));
        assert!(matches!(
            gd.with_attribute("times", arr1(&[1.0]).into()),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_equality_ignores_attributes() {
        let (values, locs, sensor, times) = parts();
        let a = GeoData::from_parts(values, "Cartesian", locs, sensor, times).unwrap();
        let b = a.clone().with_attribute("extra", arr1(&[1.0]).into()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_inequality() {
        let (values, locs, sensor, times) = parts();
        let a = GeoData::from_parts(values.clone(), "Cartesian", locs.clone(), sensor.clone(), times.clone()).unwrap();

        let b = GeoData::from_parts(values.clone(), "Spherical", locs.clone(), sensor.clone(), times.clone()).unwrap();
        assert_ne!(a, b);

        let mut renamed = BTreeMap::new();
        renamed.insert("te".to_string(), values["ne"].clone());
        let c = GeoData::from_parts(renamed, "Cartesian", locs.clone(), sensor.clone(), times.clone()).unwrap();
        assert_ne!(a, c);

        let moved = NumericArray::from(arr1(&[65.0, -147.0, 0.3]));
        let d = GeoData::from_parts(values, "Cartesian", locs, moved, times).unwrap();
        assert_ne!(a, d);
    }
}
