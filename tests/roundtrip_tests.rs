//! Integration tests for writing containers and reading them back.

use geodata::ogawa::IArchive;
use geodata::serialize::{write_nodes, Hierarchy, NodeRef};
use geodata::{read_h5_main, Error, Field, GeoData, NumericArray};
use ndarray::{arr1, arr2, Array2};
use std::collections::BTreeMap;

use tempfile::NamedTempFile;

fn radar_scan() -> GeoData {
    let mut values = BTreeMap::new();
    values.insert(
        "Ne".to_string(),
        NumericArray::from(arr2(&[[1.0e11, 2.0e11, f64::NAN], [3.0e11, 4.0e11, 5.0e11]])),
    );
    values.insert(
        "Te".to_string(),
        NumericArray::from(arr2(&[[1200.0, 1250.0, 1300.0], [1400.0, f64::NAN, 1500.0]])),
    );
    values.insert("flags".to_string(), NumericArray::from(arr2(&[[0i64, 1, 0], [1, 1, 0]])));

    GeoData::from_parts(
        values,
        "Spherical",
        arr2(&[[150.0, 15.0, 77.5], [300.0, 15.0, 77.5]]).into(),
        arr1(&[65.13, -147.47, 0.213]).into(),
        arr2(&[[1.4e9, 1.4e9 + 60.0], [1.4e9 + 60.0, 1.4e9 + 120.0], [1.4e9 + 120.0, 1.4e9 + 180.0]]).into(),
    )
    .expect("Failed to construct")
}

#[test]
fn test_roundtrip_container() {
    let temp = NamedTempFile::new().expect("Failed to create temp file");
    let gd = radar_scan();

    gd.write_h5(temp.path()).expect("Failed to write");
    let back = GeoData::read_h5(temp.path()).expect("Failed to read");

    assert_eq!(back, gd);
    assert_eq!(back.datanames(), vec!["Ne", "Te", "flags"]);
    // Integer fields keep their kind.
    assert!(matches!(back.value("flags"), Some(NumericArray::Int(_))));
}

#[test]
fn test_roundtrip_extra_attributes() {
    let temp = NamedTempFile::new().expect("Failed to create temp file");
    let gd = radar_scan()
        .with_attribute("pulse_length", arr1(&[480.0e-6]).into())
        .expect("Failed to attach")
        .with_attribute("beam_codes", arr1(&[64157i64, 64964]).into())
        .expect("Failed to attach");

    gd.write_h5(temp.path()).expect("Failed to write");
    let back = GeoData::read_h5(temp.path()).expect("Failed to read");

    assert_eq!(back.attributes(), gd.attributes());
}

#[test]
fn test_file_layout() {
    let temp = NamedTempFile::new().expect("Failed to create temp file");
    radar_scan().write_h5(temp.path()).expect("Failed to write");

    let hierarchy = Hierarchy::read(temp.path()).expect("Failed to read");
    let paths: Vec<&str> = hierarchy.groups().iter().map(|g| g.path.as_str()).collect();
    assert_eq!(paths, vec!["/", "/data"]);

    let root = hierarchy.root().expect("No root group");
    let leaves: Vec<&str> = root.leaves.keys().map(String::as_str).collect();
    assert_eq!(leaves, vec!["coordnames", "dataloc", "sensorloc", "times"]);
    assert_eq!(root.leaves["coordnames"], Field::Text("Spherical".to_string()));

    let data = hierarchy.top_level_group("data").expect("No data group");
    assert_eq!(data.leaves.len(), 3);
}

#[test]
fn test_archive_is_finalized() {
    let temp = NamedTempFile::new().expect("Failed to create temp file");
    radar_scan().write_h5(temp.path()).expect("Failed to write");

    let archive = IArchive::open(temp.path()).expect("Failed to open");
    assert_eq!(archive.version(), 1);
    // Header plus five canonical nodes.
    assert_eq!(archive.root().num_children(), 6);
}

#[test]
fn test_buffered_and_mapped_reads_agree() {
    let temp = NamedTempFile::new().expect("Failed to create temp file");
    radar_scan().write_h5(temp.path()).expect("Failed to write");

    let mapped = Hierarchy::read_opts(temp.path(), true).expect("Failed to read");
    let buffered = Hierarchy::read_opts(temp.path(), false).expect("Failed to read");
    assert_eq!(mapped.groups().len(), buffered.groups().len());
    assert_eq!(mapped.field("times"), buffered.field("times"));
    assert_eq!(mapped.field("coordnames"), buffered.field("coordnames"));
}

#[test]
fn test_missing_field_is_omitted() {
    let temp = NamedTempFile::new().expect("Failed to create temp file");
    let locs: NumericArray = arr2(&[[0.0, 0.0, 0.0]]).into();
    let sensor: NumericArray = arr1(&[0.0, 0.0, 0.0]).into();
    write_nodes(
        temp.path(),
        &[
            ("data", NodeRef::Group(Vec::new())),
            ("coordnames", NodeRef::Text("Cartesian")),
            ("dataloc", NodeRef::Array(&locs)),
            ("sensorloc", NodeRef::Array(&sensor)),
        ],
    )
    .expect("Failed to write");

    let fields = read_h5_main(temp.path()).expect("Failed to read");
    assert_eq!(fields.len(), 4);

    let err = GeoData::read_h5(temp.path()).unwrap_err();
    assert!(matches!(err, Error::PartialRecord { expected: 5, found: 4 }));
}

#[test]
fn test_write_failure_leaves_unfinalized_file() {
    let temp = NamedTempFile::new().expect("Failed to create temp file");
    let inner: NumericArray = Array2::<f64>::zeros((1, 1)).into();
    let nested = NodeRef::Group(vec![("deep", NodeRef::Group(vec![("x", NodeRef::Array(&inner))]))]);

    let err = write_nodes(temp.path(), &[("data", nested)]).unwrap_err();
    assert!(matches!(err, Error::WriteFailed(_)));

    // The handle was released and the partial archive is refused.
    assert!(matches!(IArchive::open(temp.path()), Err(Error::InvalidStructure(_))));
}

#[test]
fn test_hdf5_file_rejected() {
    let temp = NamedTempFile::new().expect("Failed to create temp file");
    let mut bytes = b"\x89HDF\r\n\x1a\n".to_vec();
    bytes.resize(64, 0);
    std::fs::write(temp.path(), &bytes).expect("Failed to write");

    assert!(matches!(GeoData::read_h5(temp.path()), Err(Error::InvalidMagic)));
}

#[test]
fn test_coordinate_tag_with_nul_not_written() {
    let temp = NamedTempFile::new().expect("Failed to create temp file");
    let gd = GeoData::from_parts(
        BTreeMap::new(),
        "Spher\0ical",
        arr2(&[[0.0, 0.0, 0.0]]).into(),
        arr1(&[0.0, 0.0, 0.0]).into(),
        arr1(&[0.0]).into(),
    )
    .expect("Failed to construct");

    assert!(matches!(gd.write_h5(temp.path()), Err(Error::WriteFailed(_))));
}

#[test]
fn test_read_missing_file() {
    let err = GeoData::read_h5("/nonexistent/scan.geo").unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_) | Error::Io(_)));
}
