//! Point-array conversions.
//!
//! Every function takes one point per row and returns a new array of the
//! same row count.

use glam::DVec3;
use ndarray::{Array2, ArrayView2};

use super::CoordinateSystem;
use crate::util::{Error, Result};

fn check_columns(points: &ArrayView2<'_, f64>, system: &str) -> Result<()> {
    if points.ncols() != 3 {
        return Err(Error::argument(format!(
            "{} points need 3 columns, got {}",
            system,
            points.ncols()
        )));
    }
    Ok(())
}

fn rows3<'a>(points: &'a ArrayView2<'_, f64>) -> impl Iterator<Item = DVec3> + 'a {
    points.rows().into_iter().map(|r| DVec3::new(r[0], r[1], r[2]))
}

fn collect_rows(rows: impl Iterator<Item = DVec3>, count: usize) -> Array2<f64> {
    let mut out = Array2::zeros((count, 3));
    for (mut row, v) in out.rows_mut().into_iter().zip(rows) {
        row[0] = v.x;
        row[1] = v.y;
        row[2] = v.z;
    }
    out
}

/// Spherical `(range, azimuth°, elevation°)` to Cartesian `(x, y, z)`.
pub fn to_cartesian(points: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    check_columns(&points, "Spherical")?;
    let rows = rows3(&points).map(|p| {
        let (range, az, el) = (p.x, p.y.to_radians(), p.z.to_radians());
        DVec3::new(az.sin() * el.cos(), az.cos() * el.cos(), el.sin()) * range
    });
    Ok(collect_rows(rows, points.nrows()))
}

/// Cartesian `(x, y, z)` to spherical `(range, azimuth°, elevation°)`.
///
/// Azimuth lies in `[0, 360)`. The origin maps to `(0, 0, 0)`.
pub fn to_spherical(points: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    check_columns(&points, "Cartesian")?;
    let rows = rows3(&points).map(|p| {
        let range = p.length();
        if range == 0.0 {
            return DVec3::ZERO;
        }
        let az = p.x.atan2(p.y).to_degrees().rem_euclid(360.0);
        let el = (p.z / range).clamp(-1.0, 1.0).asin().to_degrees();
        DVec3::new(range, az, el)
    });
    Ok(collect_rows(rows, points.nrows()))
}

/// Express `points` given in `from` in the `to` system.
///
/// Supported: identity when the tags match, Spherical to Cartesian and
/// Cartesian to Spherical. Any other pairing is an invalid argument.
pub fn convert(points: ArrayView2<'_, f64>, from: &CoordinateSystem, to: &CoordinateSystem) -> Result<Array2<f64>> {
    match (from.canonical(), to.canonical()) {
        (a, b) if a == b => Ok(points.to_owned()),
        (CoordinateSystem::Spherical, CoordinateSystem::Cartesian) => to_cartesian(points),
        (CoordinateSystem::Cartesian, CoordinateSystem::Spherical) => to_spherical(points),
        _ => Err(Error::argument(format!(
            "no coordinate conversion from {} to {}",
            from, to
        ))),
    }
}
