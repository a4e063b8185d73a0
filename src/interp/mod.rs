//! Scattered-data interpolation.
//!
//! An [`Interpolant`] is prepared once for a pair of point sets (the
//! sample locations and the query locations) and then evaluated for any
//! number of value columns. Preparation does the geometric work:
//! sorting for 1-D inputs, Delaunay triangulation and point location for
//! higher dimensions, nearest-neighbour search.
//!
//! | Method  | 1-D               | 2-D             | N-D       |
//! |---------|-------------------|-----------------|-----------|
//! | nearest | nearest sample    | nearest sample  | nearest   |
//! | linear  | piecewise linear  | barycentric     | barycentric |
//! | cubic   | not-a-knot spline | Clough-Tocher   | -         |
//!
//! Queries outside the convex hull of the samples take the fill value,
//! except for `nearest`, which always answers.

mod clough_tocher;
mod delaunay;
mod spline;

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use smallvec::SmallVec;

use crate::util::{Error, Result};

pub use clough_tocher::CloughTocher;
pub use delaunay::Triangulation;
pub use spline::{CubicSpline, Knots};

/// Names accepted by [`Method::from_str`].
pub const METHODS: [&str; 3] = ["linear", "nearest", "cubic"];

/// Interpolation method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Method {
    #[default]
    Linear,
    Nearest,
    Cubic,
}

impl Method {
    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Nearest => "nearest",
            Self::Cubic => "cubic",
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(Self::Linear),
            "nearest" => Ok(Self::Nearest),
            "cubic" => Ok(Self::Cubic),
            other => Err(Error::argument(format!(
                "unknown method '{}'. Must be one of the following methods: {}",
                other,
                METHODS.join(", ")
            ))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_constant(column: ArrayView1<'_, f64>) -> bool {
    match column.first() {
        Some(first) => column.iter().all(|v| v == first),
        None => false,
    }
}

/// Flags for the coordinate axes worth keeping.
///
/// An axis is dropped when every row of `a` equals the first row of `a`
/// along it, or the same holds for `b`. Empty point sets never drop axes.
pub fn varying_axes(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Vec<bool> {
    (0..a.ncols())
        .map(|k| !(is_constant(a.column(k)) || is_constant(b.column(k))))
        .collect()
}

/// Axes to interpolate along when `samples` are queried at `queries`.
///
/// Starts from [`varying_axes`]. When that keeps nothing, which is the case
/// for a single query point or a set of identical ones, the axes along
/// which the samples vary are kept instead. An all-false result means every
/// sample sits at the same point; see [`Interpolant::coincident`].
pub fn interpolation_axes(samples: ArrayView2<'_, f64>, queries: ArrayView2<'_, f64>) -> Vec<bool> {
    let keep = varying_axes(samples, queries);
    if keep.iter().any(|&k| k) {
        return keep;
    }
    varying_axes(samples, samples)
}

/// Keep only the flagged columns of `points`.
pub fn reduce_axes(points: ArrayView2<'_, f64>, keep: &[bool]) -> Array2<f64> {
    let columns: Vec<usize> = keep
        .iter()
        .enumerate()
        .filter_map(|(k, &kept)| kept.then_some(k))
        .collect();
    points.select(Axis(1), &columns)
}

/// Sample rows and weights that make up one query's value.
type Stencil = SmallVec<[(usize, f64); 4]>;

enum Plan {
    /// Index of the nearest sample per query.
    Nearest(Vec<Option<usize>>),
    /// Weighted sum of samples per query.
    Weighted(Vec<Option<Stencil>>),
    /// Interval and offset per query.
    Spline { knots: Knots, located: Vec<Option<(usize, f64)>> },
    /// Triangle and barycentric coordinates per query.
    CloughTocher {
        tri: Triangulation,
        located: Vec<Option<(usize, SmallVec<[f64; 4]>)>>,
    },
}

/// Interpolation from one point set onto another.
pub struct Interpolant {
    method: Method,
    num_samples: usize,
    plan: Plan,
}

impl Interpolant {
    /// Prepare interpolation from `samples` onto `queries`, both with one
    /// row per point and one column per coordinate axis.
    pub fn new(samples: ArrayView2<'_, f64>, queries: ArrayView2<'_, f64>, method: Method) -> Result<Self> {
        let dim = samples.ncols();
        if queries.ncols() != dim {
            return Err(Error::argument(format!(
                "sample points have {} coordinates but query points have {}",
                dim,
                queries.ncols()
            )));
        }
        if dim == 0 {
            return Err(Error::argument("no coordinate axis left to interpolate along"));
        }

        let plan = match (method, dim) {
            (Method::Nearest, _) => Plan::Nearest(nearest(samples, queries)),
            (Method::Linear, 1) => {
                let knots = Knots::new(samples.column(0));
                let stencils = queries
                    .column(0)
                    .iter()
                    .map(|&q| {
                        knots
                            .locate(q)
                            .map(|(k, off)| spline::linear_weights(&knots, k, off).into_iter().collect())
                    })
                    .collect();
                Plan::Weighted(stencils)
            }
            (Method::Linear, _) => {
                let tri = Triangulation::new(samples);
                let stencils = queries
                    .rows()
                    .into_iter()
                    .map(|q| {
                        tri.locate(q).map(|(s, bary)| {
                            tri.vertices(s).iter().copied().zip(bary).collect::<Stencil>()
                        })
                    })
                    .collect();
                Plan::Weighted(stencils)
            }
            (Method::Cubic, 1) => {
                let knots = Knots::new(samples.column(0));
                let located = queries.column(0).iter().map(|&q| knots.locate(q)).collect();
                Plan::Spline { knots, located }
            }
            (Method::Cubic, 2) => {
                let tri = Triangulation::new(samples);
                let located = queries.rows().into_iter().map(|q| tri.locate(q)).collect();
                Plan::CloughTocher { tri, located }
            }
            (Method::Cubic, _) => {
                return Err(Error::argument(format!(
                    "cubic interpolation supports 1 or 2 varying axes, got {}",
                    dim
                )))
            }
        };

        tracing::debug!(
            %method,
            dim,
            samples = samples.nrows(),
            queries = queries.nrows(),
            "prepared interpolant"
        );
        Ok(Self {
            method,
            num_samples: samples.nrows(),
            plan,
        })
    }

    /// Interpolation from samples that all sit at one point.
    ///
    /// `nearest` answers every query with the first sample that has finite
    /// coordinates. The other methods answer only queries coinciding with
    /// that point; the rest take the fill value.
    pub fn coincident(samples: ArrayView2<'_, f64>, queries: ArrayView2<'_, f64>, method: Method) -> Result<Self> {
        if queries.ncols() != samples.ncols() {
            return Err(Error::argument(format!(
                "sample points have {} coordinates but query points have {}",
                samples.ncols(),
                queries.ncols()
            )));
        }
        if samples.ncols() == 0 {
            return Err(Error::argument("no coordinate axis to interpolate along"));
        }

        let mut located = nearest(samples, queries);
        if method != Method::Nearest {
            for (slot, q) in located.iter_mut().zip(queries.rows()) {
                if slot.is_some_and(|i| samples.row(i) != q) {
                    *slot = None;
                }
            }
        }

        tracing::debug!(%method, samples = samples.nrows(), queries = queries.nrows(), "samples share one location");
        Ok(Self {
            method,
            num_samples: samples.nrows(),
            plan: Plan::Nearest(located),
        })
    }

    /// Method this interpolant was prepared with.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Number of query points.
    pub fn num_queries(&self) -> usize {
        match &self.plan {
            Plan::Nearest(v) => v.len(),
            Plan::Weighted(v) => v.len(),
            Plan::Spline { located, .. } => located.len(),
            Plan::CloughTocher { located, .. } => located.len(),
        }
    }

    /// Interpolate one column of sample values (one per sample point).
    /// Queries without a value take `fill_value`.
    pub fn evaluate(&self, values: ArrayView1<'_, f64>, fill_value: f64) -> Result<Array1<f64>> {
        if values.len() != self.num_samples {
            return Err(Error::shape(
                "values",
                format!("{} samples", self.num_samples),
                format!("{}", values.len()),
            ));
        }

        let out = match &self.plan {
            Plan::Nearest(nearest) => nearest
                .iter()
                .map(|n| n.map_or(fill_value, |i| values[i]))
                .collect(),
            Plan::Weighted(stencils) => stencils
                .iter()
                .map(|s| match s {
                    Some(s) => s.iter().map(|&(i, w)| values[i] * w).sum(),
                    None => fill_value,
                })
                .collect(),
            Plan::Spline { knots, located } => {
                let spline = CubicSpline::fit(knots, values)?;
                located
                    .iter()
                    .map(|l| l.map_or(fill_value, |(k, off)| spline.eval(k, off)))
                    .collect()
            }
            Plan::CloughTocher { tri, located } => {
                let ct = CloughTocher::fit(tri, values.reborrow());
                located
                    .iter()
                    .map(|l| match l {
                        Some((s, bary)) => ct.eval(*s, bary),
                        None => fill_value,
                    })
                    .collect()
            }
        };
        Ok(out)
    }
}

/// Interpolate `values` given at `samples` onto `queries`.
pub fn griddata(
    samples: ArrayView2<'_, f64>,
    values: ArrayView1<'_, f64>,
    queries: ArrayView2<'_, f64>,
    method: Method,
    fill_value: f64,
) -> Result<Array1<f64>> {
    Interpolant::new(samples, queries, method)?.evaluate(values, fill_value)
}

/// Nearest sample by Euclidean distance; ties go to the lower index.
/// `None` only when no sample (or the query) has finite coordinates.
fn nearest(samples: ArrayView2<'_, f64>, queries: ArrayView2<'_, f64>) -> Vec<Option<usize>> {
    queries
        .rows()
        .into_iter()
        .map(|q| {
            let mut best: Option<(usize, f64)> = None;
            for (i, s) in samples.rows().into_iter().enumerate() {
                let d2: f64 = s.iter().zip(q.iter()).map(|(a, b)| (a - b) * (a - b)).sum();
                if d2.is_nan() {
                    continue;
                }
                if best.map_or(true, |(_, bd)| d2 < bd) {
                    best = Some((i, d2));
                }
            }
            best.map(|(i, _)| i)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_method_parse() {
        assert_eq!("linear".parse::<Method>().unwrap(), Method::Linear);
        assert_eq!("nearest".parse::<Method>().unwrap(), Method::Nearest);
        assert_eq!("cubic".parse::<Method>().unwrap(), Method::Cubic);
        assert_eq!(Method::default(), Method::Linear);

        let err = "spline".parse::<Method>().unwrap_err();
        assert!(err.to_string().contains("linear, nearest, cubic"));
    }

    #[test]
    fn test_varying_axes() {
        let a = arr2(&[[1.0, 5.0, 0.0], [2.0, 5.0, 1.0]]);
        let b = arr2(&[[1.0, 3.0, 7.0], [1.5, 4.0, 7.0]]);
        assert_eq!(varying_axes(a.view(), b.view()), vec![true, false, false]);
        assert_eq!(reduce_axes(a.view(), &[true, false, false]), arr2(&[[1.0], [2.0]]));
    }

    #[test]
    fn test_nearest_tie_takes_lowest_index() {
        let samples = arr2(&[[0.0], [2.0], [2.0]]);
        let queries = arr2(&[[1.0], [1.9], [10.0]]);
        let out = griddata(samples.view(), arr1(&[10.0, 20.0, 30.0]).view(), queries.view(), Method::Nearest, f64::NAN)
            .unwrap();
        assert_eq!(out, arr1(&[10.0, 20.0, 20.0]));
    }

    #[test]
    fn test_linear_1d_fills_outside() {
        let samples = arr2(&[[2.0], [0.0], [1.0]]);
        let values = arr1(&[4.0, 0.0, 1.0]);
        let queries = arr2(&[[0.5], [1.5], [2.0], [-1.0], [3.0]]);
        let out = griddata(samples.view(), values.view(), queries.view(), Method::Linear, -1.0).unwrap();
        assert_eq!(out.slice(ndarray::s![..3]), arr1(&[0.5, 2.5, 4.0]));
        assert_eq!(out[3], -1.0);
        assert_eq!(out[4], -1.0);
    }

    #[test]
    fn test_linear_2d_plane() {
        let samples = arr2(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
        let values = samples.rows().into_iter().map(|r| 1.0 + 2.0 * r[0] + 3.0 * r[1]).collect::<Array1<f64>>();
        let queries = arr2(&[[0.25, 0.5], [0.9, 0.1], [2.0, 2.0]]);
        let out = griddata(samples.view(), values.view(), queries.view(), Method::Linear, f64::NAN).unwrap();
        assert!((out[0] - 3.0).abs() < 1e-12);
        assert!((out[1] - 3.1).abs() < 1e-12);
        assert!(out[2].is_nan());
    }

    #[test]
    fn test_plan_reused_across_columns() {
        let samples = arr2(&[[0.0], [1.0], [2.0], [3.0]]);
        let queries = arr2(&[[0.5], [2.5]]);
        let plan = Interpolant::new(samples.view(), queries.view(), Method::Cubic).unwrap();
        assert_eq!(plan.num_queries(), 2);
        assert_eq!(plan.method(), Method::Cubic);

        let a = plan.evaluate(arr1(&[0.0, 1.0, 2.0, 3.0]).view(), f64::NAN).unwrap();
        let b = plan.evaluate(arr1(&[0.0, 1.0, 4.0, 9.0]).view(), f64::NAN).unwrap();
        assert!((a[0] - 0.5).abs() < 1e-12);
        assert!((b[1] - 6.25).abs() < 1e-12);

        assert!(matches!(
            plan.evaluate(arr1(&[1.0]).view(), 0.0),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_rejections() {
        let three = arr2(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        let two = arr2(&[[0.0, 0.0]]);
        assert!(matches!(
            Interpolant::new(three.view(), two.view(), Method::Linear),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Interpolant::new(three.view(), three.view(), Method::Cubic),
            Err(Error::InvalidArgument(_))
        ));
        let none = Array2::<f64>::zeros((2, 0));
        assert!(matches!(
            Interpolant::new(none.view(), none.view(), Method::Nearest),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Interpolant::coincident(none.view(), none.view(), Method::Nearest),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_interpolation_axes_single_query() {
        let samples = arr2(&[[0.0, 1.0, 7.0], [1.0, 1.0, 7.0], [0.0, 2.0, 7.0]]);
        let one = arr2(&[[0.5, 1.5, 7.0]]);
        assert_eq!(interpolation_axes(samples.view(), one.view()), vec![true, true, false]);

        let same = arr2(&[[0.5, 1.5, 9.0], [0.5, 1.5, 9.0]]);
        assert_eq!(interpolation_axes(samples.view(), same.view()), vec![true, true, false]);

        let spread = arr2(&[[0.5, 1.5, 7.0], [0.2, 1.5, 7.0]]);
        assert_eq!(interpolation_axes(samples.view(), spread.view()), vec![true, false, false]);

        let stacked = arr2(&[[3.0, 4.0], [3.0, 4.0]]);
        assert_eq!(interpolation_axes(stacked.view(), one.slice(ndarray::s![.., ..2])), vec![false, false]);
    }

    #[test]
    fn test_coincident_samples() {
        let samples = arr2(&[[3.0, 4.0], [3.0, 4.0]]);
        let values = arr1(&[5.0, 7.0]);
        let queries = arr2(&[[3.0, 4.0], [3.0, 4.5], [f64::NAN, 4.0]]);

        let nearest = Interpolant::coincident(samples.view(), queries.view(), Method::Nearest).unwrap();
        let out = nearest.evaluate(values.view(), -1.0).unwrap();
        assert_eq!(out.slice(ndarray::s![..2]), arr1(&[5.0, 5.0]));
        assert_eq!(out[2], -1.0);

        for method in [Method::Linear, Method::Cubic] {
            let plan = Interpolant::coincident(samples.view(), queries.view(), method).unwrap();
            assert_eq!(plan.evaluate(values.view(), -1.0).unwrap(), arr1(&[5.0, -1.0, -1.0]));
        }
    }
}
