//! Piecewise cubic, C1 interpolation on a planar triangulation.
//!
//! Each triangle is split at its centroid into three micro-triangles
//! carrying cubic Bernstein-Bezier patches (Clough-Tocher). Vertex
//! gradients are estimated as the area-weighted mean of the linear
//! gradients of the incident triangles.

use nalgebra::Vector2;
use ndarray::ArrayView1;

use super::delaunay::Triangulation;

/// Fitted Clough-Tocher interpolant for one set of sample values.
pub struct CloughTocher<'a> {
    tri: &'a Triangulation,
    values: ArrayView1<'a, f64>,
    gradients: Vec<Vector2<f64>>,
}

impl<'a> CloughTocher<'a> {
    /// Estimate vertex gradients for `values` (indexed by input row).
    pub fn fit(tri: &'a Triangulation, values: ArrayView1<'a, f64>) -> Self {
        let mut sum = vec![Vector2::zeros(); values.len()];
        let mut weight = vec![0.0; values.len()];

        for s in 0..tri.len() {
            let v = tri.vertices(s);
            let [p0, p1, p2] = [v[0], v[1], v[2]].map(|i| planar(tri, i));
            let (e1, e2) = (p1 - p0, p2 - p0);
            let det = e1.x * e2.y - e1.y * e2.x;
            if det == 0.0 {
                continue;
            }
            let d1 = values[v[1]] - values[v[0]];
            let d2 = values[v[2]] - values[v[0]];
            let grad = Vector2::new(e2.y * d1 - e1.y * d2, -e2.x * d1 + e1.x * d2) / det;
            let area = det.abs() / 2.0;

            for &i in v {
                sum[i] += grad * area;
                weight[i] += area;
            }
        }

        let gradients = sum
            .into_iter()
            .zip(weight)
            .map(|(g, w)| if w > 0.0 { g / w } else { Vector2::zeros() })
            .collect();
        Self { tri, values, gradients }
    }

    /// Evaluate in simplex `index` at barycentric coordinates `bary`.
    pub fn eval(&self, index: usize, bary: &[f64]) -> f64 {
        let v = self.tri.vertices(index);
        let p = [v[0], v[1], v[2]].map(|i| planar(self.tri, i));
        let f = [v[0], v[1], v[2]].map(|i| self.values[i]);
        let g = [v[0], v[1], v[2]].map(|i| self.gradients[i]);

        // Directional derivative at vertex i towards vertex j.
        let df = |i: usize, j: usize| g[i].dot(&(p[j] - p[i]));

        let c3000 = f[0];
        let c0300 = f[1];
        let c0030 = f[2];
        let c2100 = f[0] + df(0, 1) / 3.0;
        let c2010 = f[0] + df(0, 2) / 3.0;
        let c1200 = f[1] + df(1, 0) / 3.0;
        let c0210 = f[1] + df(1, 2) / 3.0;
        let c1020 = f[2] + df(2, 0) / 3.0;
        let c0120 = f[2] + df(2, 1) / 3.0;

        let c2001 = (c2100 + c2010 + c3000) / 3.0;
        let c0201 = (c1200 + c0300 + c0210) / 3.0;
        let c0021 = (c1020 + c0120 + c0030) / 3.0;

        // Cross-boundary derivative linear along each edge.
        let centroid = (p[0] + p[1] + p[2]) / 3.0;
        let slide = |a: usize, b: usize| {
            let edge = p[b] - p[a];
            -(centroid - p[a]).dot(&edge) / edge.norm_squared()
        };
        let (g1, g2, g3) = (slide(1, 2), slide(2, 0), slide(0, 1));

        let c0111 = (g1 * (-c0300 + 3.0 * c0210 - 3.0 * c0120 + c0030)
            + (-c0300 + 2.0 * c0210 - c0120 + c0021 + c0201))
            / 2.0;
        let c1011 = (g2 * (-c0030 + 3.0 * c1020 - 3.0 * c2010 + c3000)
            + (-c0030 + 2.0 * c1020 - c2010 + c2001 + c0021))
            / 2.0;
        let c1101 = (g3 * (-c3000 + 3.0 * c2100 - 3.0 * c1200 + c0300)
            + (-c3000 + 2.0 * c2100 - c1200 + c2001 + c0201))
            / 2.0;

        let c1002 = (c1101 + c1011 + c2001) / 3.0;
        let c0102 = (c1101 + c0111 + c0201) / 3.0;
        let c0012 = (c1011 + c0111 + c0021) / 3.0;
        let c0003 = (c1002 + c0102 + c0012) / 3.0;

        // Barycentric coordinates in the micro-triangle; one of b1..b3 is 0.
        let min = bary[0].min(bary[1]).min(bary[2]);
        let (b1, b2, b3, b4) = (bary[0] - min, bary[1] - min, bary[2] - min, 3.0 * min);

        b1.powi(3) * c3000
            + 3.0 * b1 * b1 * b2 * c2100
            + 3.0 * b1 * b1 * b3 * c2010
            + 3.0 * b1 * b1 * b4 * c2001
            + 3.0 * b1 * b2 * b2 * c1200
            + 6.0 * b1 * b2 * b4 * c1101
            + 3.0 * b1 * b3 * b3 * c1020
            + 6.0 * b1 * b3 * b4 * c1011
            + 3.0 * b1 * b4 * b4 * c1002
            + b2.powi(3) * c0300
            + 3.0 * b2 * b2 * b3 * c0210
            + 3.0 * b2 * b2 * b4 * c0201
            + 3.0 * b2 * b3 * b3 * c0120
            + 6.0 * b2 * b3 * b4 * c0111
            + 3.0 * b2 * b4 * b4 * c0102
            + b3.powi(3) * c0030
            + 3.0 * b3 * b3 * b4 * c0021
            + 3.0 * b3 * b4 * b4 * c0012
            + b4.powi(3) * c0003
    }
}

fn planar(tri: &Triangulation, index: usize) -> Vector2<f64> {
    let p = tri.point(index);
    Vector2::new(p[0], p[1])
}
