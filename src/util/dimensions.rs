//! Array shape support.
//!
//! Dimensions describe the shape of an array node as stored in an archive.

use smallvec::SmallVec;

/// Dimensions of a multi-dimensional array.
///
/// Rank 0 is a scalar, rank 2 is the `(locations, times)` layout of a
/// value field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dimensions {
    /// Size of each dimension. Empty means scalar (rank 0).
    dims: SmallVec<[usize; 4]>,
}

impl Dimensions {
    /// Create scalar dimensions (rank 0).
    pub fn scalar() -> Self {
        Self { dims: SmallVec::new() }
    }

    /// Create 1D dimensions.
    pub fn d1(size: usize) -> Self {
        Self { dims: smallvec::smallvec![size] }
    }

    /// Create 2D dimensions.
    pub fn d2(rows: usize, cols: usize) -> Self {
        Self { dims: smallvec::smallvec![rows, cols] }
    }

    /// Create from a slice of sizes.
    pub fn from_slice(sizes: &[usize]) -> Self {
        Self { dims: SmallVec::from_slice(sizes) }
    }

    /// Get the rank (number of dimensions).
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Get the size of a specific dimension.
    pub fn size(&self, dim: usize) -> Option<usize> {
        self.dims.get(dim).copied()
    }

    /// Get all dimension sizes as a slice.
    pub fn sizes(&self) -> &[usize] {
        &self.dims
    }

    /// Get the total number of elements (product of all dimensions).
    pub fn num_points(&self) -> usize {
        if self.dims.is_empty() {
            1
        } else {
            self.dims.iter().product()
        }
    }

    /// Check if this represents a scalar (rank 0).
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }
}

impl From<&[usize]> for Dimensions {
    fn from(sizes: &[usize]) -> Self {
        Self::from_slice(sizes)
    }
}

impl From<Vec<usize>> for Dimensions {
    fn from(v: Vec<usize>) -> Self {
        Self { dims: SmallVec::from_vec(v) }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, s) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, " x ")?;
            }
            write!(f, "{}", s)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar() {
        let d = Dimensions::scalar();
        assert_eq!(d.rank(), 0);
        assert!(d.is_scalar());
        assert_eq!(d.num_points(), 1);
        assert_eq!(d.to_string(), "[]");
    }

    #[test]
    fn test_2d() {
        let d = Dimensions::d2(12, 5);
        assert_eq!(d.rank(), 2);
        assert_eq!(d.size(0), Some(12));
        assert_eq!(d.size(1), Some(5));
        assert_eq!(d.size(2), None);
        assert_eq!(d.num_points(), 60);
        assert_eq!(format!("{}", d), "[12 x 5]");
    }

    #[test]
    fn test_zero_sized() {
        let d: Dimensions = vec![0, 3].into();
        assert_eq!(d.num_points(), 0);
        assert_eq!(d.sizes(), &[0, 3]);
    }
}
