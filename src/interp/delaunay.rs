//! Delaunay triangulation in any dimension (Bowyer-Watson).
//!
//! Points are centred and uniformly scaled into `[-1, 1]^d` before
//! insertion; uniform scaling preserves the Delaunay property. A large
//! enclosing simplex seeds the construction and is stripped at the end, so
//! the union of the remaining simplices is the convex hull of the input.

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector};
use ndarray::{ArrayView1, ArrayView2};
use smallvec::SmallVec;

/// Half-width of the seed simplex's corner, in normalized units.
const SEED_EXTENT: f64 = 100.0;

/// Relative slack of the in-sphere test. Points on a circumsphere count as
/// inside, which keeps co-spherical inputs (regular grids) consistent.
const IN_SPHERE_TOLERANCE: f64 = 1e-9;

/// Barycentric coordinates below this are outside a simplex.
const INSIDE_TOLERANCE: f64 = 1e-10;

/// Vertex indices of one simplex.
pub type Vertices = SmallVec<[usize; 4]>;

struct Cell {
    vertices: Vertices,
    /// Circumcentre and squared radius; `None` for flat cells.
    sphere: Option<(DVector<f64>, f64)>,
}

struct Simplex {
    vertices: Vertices,
    /// Inverse of the edge matrix `[v0 - vd, .., v(d-1) - vd]`.
    inverse: DMatrix<f64>,
}

/// Delaunay triangulation of a point set.
pub struct Triangulation {
    dim: usize,
    center: DVector<f64>,
    scale: f64,
    points: Vec<DVector<f64>>,
    simplices: Vec<Simplex>,
}

impl Triangulation {
    /// Triangulate the rows of `points`. Rows with non-finite coordinates
    /// are left out. Fewer than `d + 1` affinely independent points give
    /// an empty triangulation.
    pub fn new(points: ArrayView2<'_, f64>) -> Self {
        let dim = points.ncols();
        let usable: Vec<usize> = (0..points.nrows())
            .filter(|&i| points.row(i).iter().all(|v| v.is_finite()))
            .collect();

        let (center, scale) = bounding_transform(points, &usable, dim);
        let mut coords: Vec<DVector<f64>> = points
            .rows()
            .into_iter()
            .map(|r| (DVector::from_iterator(dim, r.iter().copied()) - &center) / scale)
            .collect();

        let mut tri = Self {
            dim,
            center,
            scale,
            points: Vec::new(),
            simplices: Vec::new(),
        };
        if dim == 0 || usable.len() < dim + 1 {
            tri.points = coords;
            return tri;
        }

        let first_seed = coords.len();
        coords.extend(seed_simplex(dim));
        let is_seed = |v: usize| v >= first_seed;

        let seed: Vertices = (first_seed..first_seed + dim + 1).collect();
        let mut cells = vec![make_cell(&coords, seed)];

        for &p in &usable {
            let x = &coords[p];
            let (bad, good): (Vec<Cell>, Vec<Cell>) = cells.into_iter().partition(|cell| match &cell.sphere {
                Some((c, r2)) => (x - c).norm_squared() <= r2 * (1.0 + IN_SPHERE_TOLERANCE),
                None => false,
            });
            cells = good;

            if bad.is_empty() {
                tracing::warn!(point = p, "point not inside any circumsphere, skipped");
                continue;
            }

            let mut facets: BTreeMap<Vertices, usize> = BTreeMap::new();
            for cell in &bad {
                for skip in 0..cell.vertices.len() {
                    let mut facet: Vertices = cell
                        .vertices
                        .iter()
                        .enumerate()
                        .filter(|&(i, _)| i != skip)
                        .map(|(_, &v)| v)
                        .collect();
                    facet.sort_unstable();
                    *facets.entry(facet).or_insert(0) += 1;
                }
            }

            for (facet, count) in facets {
                if count == 1 {
                    let mut vertices = facet;
                    vertices.push(p);
                    cells.push(make_cell(&coords, vertices));
                }
            }
        }

        coords.truncate(first_seed);
        tri.simplices = cells
            .into_iter()
            .filter(|cell| !cell.vertices.iter().any(|&v| is_seed(v)))
            .filter_map(|cell| {
                let inverse = edge_matrix(&coords, &cell.vertices).try_inverse()?;
                Some(Simplex { vertices: cell.vertices, inverse })
            })
            .collect();
        tri.points = coords;

        tracing::trace!(dim, points = usable.len(), simplices = tri.simplices.len(), "triangulated");
        tri
    }

    /// Dimension of the triangulated space.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of simplices.
    pub fn len(&self) -> usize {
        self.simplices.len()
    }

    /// Check if the triangulation has no simplices.
    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }

    /// Vertex indices of simplex `index`.
    pub fn vertices(&self, index: usize) -> &[usize] {
        &self.simplices[index].vertices
    }

    /// Normalized coordinates of input point `index`.
    pub fn point(&self, index: usize) -> &DVector<f64> {
        &self.points[index]
    }

    /// Map a query into normalized coordinates.
    pub fn normalize(&self, query: ArrayView1<'_, f64>) -> DVector<f64> {
        (DVector::from_iterator(self.dim, query.iter().copied()) - &self.center) / self.scale
    }

    /// Find a simplex containing `query` and the barycentric coordinates of
    /// the query in it (ordered like [`Triangulation::vertices`]). `None`
    /// outside the convex hull.
    pub fn locate(&self, query: ArrayView1<'_, f64>) -> Option<(usize, SmallVec<[f64; 4]>)> {
        if query.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let x = self.normalize(query);

        self.simplices.iter().enumerate().find_map(|(index, simplex)| {
            let last = &self.points[simplex.vertices[self.dim]];
            let partial = &simplex.inverse * (&x - last);
            let mut bary: SmallVec<[f64; 4]> = partial.iter().copied().collect();
            bary.push(1.0 - partial.sum());
            if bary.iter().all(|&b| b >= -INSIDE_TOLERANCE) {
                Some((index, bary))
            } else {
                None
            }
        })
    }
}

fn bounding_transform(points: ArrayView2<'_, f64>, usable: &[usize], dim: usize) -> (DVector<f64>, f64) {
    let mut lo = DVector::from_element(dim, f64::INFINITY);
    let mut hi = DVector::from_element(dim, f64::NEG_INFINITY);
    for &i in usable {
        for (k, &v) in points.row(i).iter().enumerate() {
            lo[k] = lo[k].min(v);
            hi[k] = hi[k].max(v);
        }
    }
    if usable.is_empty() {
        return (DVector::zeros(dim), 1.0);
    }

    let center = (&lo + &hi) / 2.0;
    let half_extent = (&hi - &lo).amax() / 2.0;
    let scale = if half_extent > 0.0 { half_extent } else { 1.0 };
    (center, scale)
}

/// Simplex enclosing `[-1, 1]^d` with a wide margin.
fn seed_simplex(dim: usize) -> Vec<DVector<f64>> {
    let corner = DVector::from_element(dim, -SEED_EXTENT);
    let reach = 2.0 * dim as f64 * (SEED_EXTENT + 1.0) + SEED_EXTENT;
    let mut seeds = vec![corner.clone()];
    for k in 0..dim {
        let mut v = corner.clone();
        v[k] += reach;
        seeds.push(v);
    }
    seeds
}

fn edge_matrix(coords: &[DVector<f64>], vertices: &[usize]) -> DMatrix<f64> {
    let dim = vertices.len() - 1;
    let last = &coords[vertices[dim]];
    DMatrix::from_fn(dim, dim, |row, col| coords[vertices[col]][row] - last[row])
}

fn make_cell(coords: &[DVector<f64>], vertices: Vertices) -> Cell {
    let dim = vertices.len() - 1;
    let v0 = &coords[vertices[0]];
    let a = DMatrix::from_fn(dim, dim, |row, col| 2.0 * (coords[vertices[row + 1]][col] - v0[col]));
    let b = DVector::from_fn(dim, |row, _| {
        coords[vertices[row + 1]].norm_squared() - v0.norm_squared()
    });

    let sphere = a.lu().solve(&b).and_then(|center| {
        let r2 = (&center - v0).norm_squared();
        r2.is_finite().then_some((center, r2))
    });
    Cell { vertices, sphere }
}
