//! Integration tests for spatial interpolation of containers.

use geodata::coords;
use geodata::{CoordinateSystem, Error, GeoData, Method, NumericArray};
use ndarray::{arr1, arr2, Array2};
use std::collections::BTreeMap;

/// 3 x 3 planar grid at constant height, two time bins of a linear field.
fn plane() -> GeoData {
    let mut locs = Array2::zeros((9, 3));
    let mut ne = Array2::zeros((9, 2));
    for i in 0..3 {
        for j in 0..3 {
            let k = i * 3 + j;
            let (x, y) = (i as f64, j as f64);
            locs[[k, 0]] = x;
            locs[[k, 1]] = y;
            locs[[k, 2]] = 100.0;
            ne[[k, 0]] = x + 2.0 * y;
            ne[[k, 1]] = 10.0 * x - y;
        }
    }
    let mut values = BTreeMap::new();
    values.insert("ne".to_string(), NumericArray::from(ne));
    GeoData::from_parts(
        values,
        "Cartesian",
        locs.into(),
        arr1(&[65.0, -147.0, 0.2]).into(),
        arr2(&[[0.0, 60.0], [60.0, 120.0]]).into(),
    )
    .expect("Failed to construct")
}

fn field(gd: &GeoData, name: &str) -> Array2<f64> {
    gd.value(name).expect("missing field").to_f64_2d(name).expect("not 2-D")
}

#[test]
fn test_linear_on_plane() {
    let gd = plane();
    let new = arr2(&[[0.5, 0.5, 100.0], [1.25, 1.5, 100.0], [2.0, 0.0, 100.0]]);
    let out = gd
        .interpolate(new.view(), &CoordinateSystem::Cartesian, Method::Linear, f64::NAN)
        .expect("Failed to interpolate");

    let ne = field(&out, "ne");
    assert_eq!(ne.shape(), &[3, 2]);
    for (k, row) in new.rows().into_iter().enumerate() {
        let (x, y) = (row[0], row[1]);
        assert!((ne[[k, 0]] - (x + 2.0 * y)).abs() < 1e-9);
        assert!((ne[[k, 1]] - (10.0 * x - y)).abs() < 1e-9);
    }
    assert_eq!(out.sample_locations(), &NumericArray::from(new));
    assert_eq!(out.times(), gd.times());
}

#[test]
fn test_linear_fill_outside_hull() {
    let gd = plane();
    let new = arr2(&[[1.0, 1.0, 100.0], [5.0, 1.0, 100.0], [-0.5, 3.5, 100.0]]);
    let out = gd
        .interpolate(new.view(), &CoordinateSystem::Cartesian, Method::Linear, -999.0)
        .expect("Failed to interpolate");

    let ne = field(&out, "ne");
    for t in 0..2 {
        assert_ne!(ne[[0, t]], -999.0);
        assert_eq!(ne[[1, t]], -999.0);
        assert_eq!(ne[[2, t]], -999.0);
    }
}

#[test]
fn test_degenerate_axis_dropped() {
    // Old locations vary along x and y; new ones share y = 7, far from the grid.
    let gd = plane();
    let new = arr2(&[[0.1, 7.0, 100.0], [1.9, 7.0, 100.0], [2.6, 7.0, 100.0]]);
    let out = gd
        .interpolate(new.view(), &CoordinateSystem::Cartesian, Method::Nearest, f64::NAN)
        .expect("Failed to interpolate");

    assert_eq!(out.num_locations(), 3);
    let ne = field(&out, "ne");
    // Nearest by x alone: x=0, 2, 2. With y dropped the first sample of each
    // x column (y=0) wins the tie.
    assert_eq!(ne.column(0).to_vec(), vec![0.0, 2.0, 2.0]);
    assert_eq!(ne.column(1).to_vec(), vec![0.0, 20.0, 20.0]);
}

#[test]
fn test_single_query_point() {
    let gd = plane();

    let inside = arr2(&[[1.25, 0.5, 100.0]]);
    let out = gd
        .interpolate(inside.view(), &CoordinateSystem::Cartesian, Method::Linear, -999.0)
        .expect("Failed to interpolate");
    let ne = field(&out, "ne");
    assert_eq!(ne.shape(), &[1, 2]);
    assert!((ne[[0, 0]] - 2.25).abs() < 1e-9);
    assert!((ne[[0, 1]] - 12.0).abs() < 1e-9);

    let outside = arr2(&[[5.0, 1.0, 100.0]]);
    let out = gd
        .interpolate(outside.view(), &CoordinateSystem::Cartesian, Method::Linear, -999.0)
        .expect("Failed to interpolate");
    assert_eq!(field(&out, "ne"), arr2(&[[-999.0, -999.0]]));

    let near = arr2(&[[1.9, 0.2, 100.0]]);
    let out = gd
        .interpolate(near.view(), &CoordinateSystem::Cartesian, Method::Nearest, -999.0)
        .expect("Failed to interpolate");
    assert_eq!(field(&out, "ne"), arr2(&[[2.0, 20.0]]));
}

#[test]
fn test_identical_query_points() {
    let gd = plane();
    let new = arr2(&[[0.5, 0.5, 100.0], [0.5, 0.5, 100.0]]);
    let out = gd
        .interpolate(new.view(), &CoordinateSystem::Cartesian, Method::Linear, f64::NAN)
        .expect("Failed to interpolate");

    let ne = field(&out, "ne");
    for k in 0..2 {
        assert!((ne[[k, 0]] - 1.5).abs() < 1e-9);
        assert!((ne[[k, 1]] - 4.5).abs() < 1e-9);
    }
}

#[test]
fn test_axis_constant_in_old_locations_ignored() {
    // The grid sits at z = 100; the targets spread along z.
    let gd = plane();
    let new = arr2(&[[0.5, 0.5, 20.0], [1.5, 1.0, 180.0], [2.0, 2.0, -40.0]]);

    for method in [Method::Linear, Method::Cubic] {
        let out = gd
            .interpolate(new.view(), &CoordinateSystem::Cartesian, method, f64::NAN)
            .expect("Failed to interpolate");
        let ne = field(&out, "ne");
        for (k, row) in new.rows().into_iter().enumerate() {
            let (x, y) = (row[0], row[1]);
            assert!((ne[[k, 0]] - (x + 2.0 * y)).abs() < 1e-9, "{}: row {}", method, k);
            assert!((ne[[k, 1]] - (10.0 * x - y)).abs() < 1e-9, "{}: row {}", method, k);
        }
    }

    let out = gd
        .interpolate(new.view(), &CoordinateSystem::Cartesian, Method::Nearest, f64::NAN)
        .expect("Failed to interpolate");
    // (2, 2) is a grid sample; far-off z does not pull it elsewhere.
    assert_eq!(field(&out, "ne").row(2).to_vec(), vec![6.0, 18.0]);
}

#[test]
fn test_cubic_on_plane() {
    let gd = plane();
    let new = arr2(&[[0.5, 1.5, 100.0], [1.7, 0.2, 100.0]]);
    let out = gd
        .interpolate(new.view(), &CoordinateSystem::Cartesian, Method::Cubic, f64::NAN)
        .expect("Failed to interpolate");

    let ne = field(&out, "ne");
    for (k, row) in new.rows().into_iter().enumerate() {
        let (x, y) = (row[0], row[1]);
        assert!((ne[[k, 0]] - (x + 2.0 * y)).abs() < 1e-9);
    }
}

#[test]
fn test_cubic_rejects_three_axes() {
    let mut values = BTreeMap::new();
    values.insert("ne".to_string(), NumericArray::from(Array2::<f64>::zeros((4, 1))));
    let gd = GeoData::from_parts(
        values,
        "Cartesian",
        arr2(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]).into(),
        arr1(&[0.0]).into(),
        arr1(&[0.0]).into(),
    )
    .expect("Failed to construct");

    let new = arr2(&[[0.1, 0.1, 0.1], [0.2, 0.3, 0.2]]);
    let err = gd
        .interpolate(new.view(), &CoordinateSystem::Cartesian, Method::Cubic, 0.0)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_unknown_method_names_allowed_set() {
    let err = "quintic".parse::<Method>().unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(err.to_string().contains("linear, nearest, cubic"));
}

#[test]
fn test_unsupported_coordinate_pair_leaves_container_unmodified() {
    let mut gd = plane();
    let before = gd.clone();
    let new = arr2(&[[1.0, 1.0, 100.0]]);

    let err = gd
        .interpolate_in_place(new.view(), &CoordinateSystem::from("WGS84"), Method::Linear, 0.0)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(gd, before);
    assert_eq!(gd.num_locations(), 9);
    assert_eq!(gd.coordinate_system(), &CoordinateSystem::Cartesian);
}

#[test]
fn test_spherical_source_into_cartesian() {
    // Ranges along north at zero elevation become points on the y axis.
    let mut values = BTreeMap::new();
    values.insert("ne".to_string(), NumericArray::from(arr2(&[[1.0], [2.0], [3.0]])));
    let gd = GeoData::from_parts(
        values,
        "Spherical",
        arr2(&[[100.0, 0.0, 0.0], [200.0, 0.0, 0.0], [300.0, 0.0, 0.0]]).into(),
        arr1(&[0.0, 0.0, 0.0]).into(),
        arr1(&[0.0]).into(),
    )
    .expect("Failed to construct");

    let new = arr2(&[[0.0, 150.0, 0.0], [0.0, 250.0, 0.0]]);
    let out = gd
        .interpolate(new.view(), &CoordinateSystem::Cartesian, Method::Linear, f64::NAN)
        .expect("Failed to interpolate");

    let ne = field(&out, "ne");
    assert!((ne[[0, 0]] - 1.5).abs() < 1e-9);
    assert!((ne[[1, 0]] - 2.5).abs() < 1e-9);
    assert_eq!(out.coordinate_system(), &CoordinateSystem::Cartesian);
}

#[test]
fn test_pure_interpolate_keeps_source() {
    let gd = plane();
    let before = gd.clone();
    let new = arr2(&[[1.0, 1.0, 100.0]]);
    let out = gd
        .interpolate(new.view(), &CoordinateSystem::Cartesian, Method::Nearest, 0.0)
        .expect("Failed to interpolate");
    assert_eq!(gd, before);
    assert_eq!(out.num_locations(), 1);

    // The same points expressed in spherical coordinates.
    let cart = gd.sample_locations().to_f64_2d("dataloc").expect("2-D");
    let sph = coords::to_spherical(cart.view()).expect("convert");
    let back = gd
        .interpolate(sph.view(), &CoordinateSystem::Spherical, Method::Nearest, 0.0)
        .expect("Failed to interpolate");
    assert_eq!(back.coordinate_system(), &CoordinateSystem::Spherical);
    assert_eq!(field(&back, "ne"), field(&gd, "ne"));
}
