//! Numeric arrays held by a container.
//!
//! The set of array variants is closed: every value field, location and
//! time axis is either an integer or a floating-point array. Anything that
//! is not one of these variants is not numeric.

use ndarray::{Array, Array2, ArrayD, Axis, Dimension, Ix2};

use crate::util::{ElementType, Error, Result};

/// An n-dimensional numeric array.
#[derive(Clone, Debug, PartialEq)]
pub enum NumericArray {
    /// Signed integer payload (all integer widths widen to `i64`).
    Int(ArrayD<i64>),
    /// Floating-point payload (`f32` widens to `f64`).
    Float(ArrayD<f64>),
}

impl NumericArray {
    /// Shape of the array.
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Int(a) => a.shape(),
            Self::Float(a) => a.shape(),
        }
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    /// Check if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type used when the array is persisted.
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Int(_) => ElementType::Int64,
            Self::Float(_) => ElementType::Float64,
        }
    }

    /// Values as `f64`, in logical (row-major) order.
    pub fn to_f64(&self) -> ArrayD<f64> {
        match self {
            Self::Int(a) => a.mapv(|v| v as f64),
            Self::Float(a) => a.clone(),
        }
    }

    /// Values as a 2-D `f64` array, failing with a shape error naming `field`.
    pub fn to_f64_2d(&self, field: &str) -> Result<Array2<f64>> {
        self.to_f64()
            .into_dimensionality::<Ix2>()
            .map_err(|_| Error::shape(field, "a 2-D array", format!("{:?}", self.shape())))
    }

    /// Select `indices` along `axis`, copying the data.
    ///
    /// Indices may repeat and keep their order.
    pub fn select(&self, axis: Axis, indices: &[usize]) -> NumericArray {
        match self {
            Self::Int(a) => Self::Int(a.select(axis, indices)),
            Self::Float(a) => Self::Float(a.select(axis, indices)),
        }
    }

    /// NaN-masked equality.
    ///
    /// Positions holding NaN in either operand are excluded and count as
    /// matching; every other position must compare equal. Integer and float
    /// arrays compare by value. Shapes must agree exactly.
    pub fn nan_masked_eq(&self, other: &NumericArray) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            _ => {
                let a = self.to_f64();
                let b = other.to_f64();
                a.iter()
                    .zip(b.iter())
                    .all(|(x, y)| x.is_nan() || y.is_nan() || x == y)
            }
        }
    }
}

impl<D: Dimension> From<Array<f64, D>> for NumericArray {
    fn from(a: Array<f64, D>) -> Self {
        Self::Float(a.into_dyn())
    }
}

impl<D: Dimension> From<Array<i64, D>> for NumericArray {
    fn from(a: Array<i64, D>) -> Self {
        Self::Int(a.into_dyn())
    }
}

/// Numeric predicate over loosely typed reader output.
///
/// True iff the value is one of the numeric array variants.
pub fn is_numeric(field: &super::Field) -> bool {
    matches!(field, super::Field::Array(_))
}
