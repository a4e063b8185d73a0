//! One-dimensional interpolation over scattered abscissae.
//!
//! Samples are sorted and de-duplicated (first occurrence wins). Queries
//! outside `[min, max]` have no value.

use nalgebra::{DMatrix, DVector};
use ndarray::ArrayView1;

use crate::util::{Error, Result};

/// Sorted, distinct sample abscissae and the input rows they came from.
#[derive(Clone, Debug)]
pub struct Knots {
    xs: Vec<f64>,
    rows: Vec<usize>,
}

impl Knots {
    /// Sort the finite entries of `points`.
    pub fn new(points: ArrayView1<'_, f64>) -> Self {
        let mut order: Vec<usize> = (0..points.len()).filter(|&i| points[i].is_finite()).collect();
        order.sort_by(|&a, &b| points[a].total_cmp(&points[b]).then(a.cmp(&b)));
        order.dedup_by(|b, a| points[*a] == points[*b]);

        Self {
            xs: order.iter().map(|&i| points[i]).collect(),
            rows: order,
        }
    }

    /// Number of distinct knots.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Check if there are no usable samples.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Input row of knot `k`.
    pub fn row(&self, k: usize) -> usize {
        self.rows[k]
    }

    /// Locate `q`: the interval `[k, k + 1]` containing it and the offset
    /// `q - xs[k]`. A single knot matches only itself, reported as `(0, 0.0)`.
    pub fn locate(&self, q: f64) -> Option<(usize, f64)> {
        let n = self.xs.len();
        if n == 0 || !q.is_finite() || q < self.xs[0] || q > self.xs[n - 1] {
            return None;
        }
        if n == 1 {
            return Some((0, 0.0));
        }
        let k = self.xs.partition_point(|&x| x <= q).saturating_sub(1).min(n - 2);
        Some((k, q - self.xs[k]))
    }

    /// Width of interval `k`.
    pub fn width(&self, k: usize) -> f64 {
        self.xs[k + 1] - self.xs[k]
    }

    /// Gather sample values in knot order.
    pub fn gather(&self, values: ArrayView1<'_, f64>) -> Vec<f64> {
        self.rows.iter().map(|&r| values[r]).collect()
    }
}

/// Linear interpolation weights `(row, weight)` for a located query.
pub fn linear_weights(knots: &Knots, k: usize, offset: f64) -> [(usize, f64); 2] {
    if knots.len() == 1 {
        return [(knots.row(0), 1.0), (knots.row(0), 0.0)];
    }
    let t = offset / knots.width(k);
    [(knots.row(k), 1.0 - t), (knots.row(k + 1), t)]
}

/// Cubic spline with not-a-knot end conditions.
///
/// Fewer than four knots degrade gracefully: three give the interpolating
/// parabola, two a straight line, one a constant.
#[derive(Clone, Debug)]
pub struct CubicSpline<'a> {
    knots: &'a Knots,
    ys: Vec<f64>,
    /// Second derivatives at the knots.
    moments: Vec<f64>,
}

impl<'a> CubicSpline<'a> {
    /// Fit the spline through `values` (indexed by input row).
    pub fn fit(knots: &'a Knots, values: ArrayView1<'_, f64>) -> Result<Self> {
        let ys = knots.gather(values);
        let n = knots.len();

        let moments = match n {
            0 | 1 | 2 => vec![0.0; n],
            3 => {
                let (h0, h1) = (knots.width(0), knots.width(1));
                let d0 = (ys[1] - ys[0]) / h0;
                let d1 = (ys[2] - ys[1]) / h1;
                vec![2.0 * (d1 - d0) / (h0 + h1); 3]
            }
            _ => not_a_knot_moments(knots, &ys)?,
        };
        Ok(Self { knots, ys, moments })
    }

    /// Evaluate on interval `k` at `offset` from its left knot.
    pub fn eval(&self, k: usize, offset: f64) -> f64 {
        if self.knots.len() == 1 {
            return self.ys[0];
        }
        let h = self.knots.width(k);
        let (a, b) = (h - offset, offset);
        let (m0, m1) = (self.moments[k], self.moments[k + 1]);
        let (y0, y1) = (self.ys[k], self.ys[k + 1]);

        m0 * a.powi(3) / (6.0 * h)
            + m1 * b.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * a
            + (y1 / h - m1 * h / 6.0) * b
    }
}

fn not_a_knot_moments(knots: &Knots, ys: &[f64]) -> Result<Vec<f64>> {
    let n = knots.len();
    let h: Vec<f64> = (0..n - 1).map(|k| knots.width(k)).collect();
    let slope: Vec<f64> = (0..n - 1).map(|k| (ys[k + 1] - ys[k]) / h[k]).collect();

    let mut a = DMatrix::zeros(n, n);
    let mut rhs = DVector::zeros(n);

    // Third derivative continuous across the first and last interior knots.
    a[(0, 0)] = h[1];
    a[(0, 1)] = -(h[0] + h[1]);
    a[(0, 2)] = h[0];
    a[(n - 1, n - 3)] = h[n - 2];
    a[(n - 1, n - 2)] = -(h[n - 3] + h[n - 2]);
    a[(n - 1, n - 1)] = h[n - 3];

    for i in 1..n - 1 {
        a[(i, i - 1)] = h[i - 1];
        a[(i, i)] = 2.0 * (h[i - 1] + h[i]);
        a[(i, i + 1)] = h[i];
        rhs[i] = 6.0 * (slope[i] - slope[i - 1]);
    }

    let m = a
        .lu()
        .solve(&rhs)
        .ok_or_else(|| Error::other("singular spline system"))?;
    Ok(m.iter().copied().collect())
}
