//! Temporal slicing.

use ndarray::Axis;

use super::GeoData;
use crate::core::NumericArray;
use crate::util::{Error, Result};

/// Which time bins to keep.
#[derive(Clone, Debug, PartialEq)]
pub enum TimeSelector {
    /// Time-axis indices, kept in the given order (duplicates allowed).
    Array(Vec<usize>),
    /// Bin start times; bins whose start appears in the list are kept, in
    /// time-axis order.
    Time(Vec<f64>),
}

impl TimeSelector {
    /// Build a selector from a kind tag (`"Array"`, `"Time"`, or none for
    /// `"Array"`) and its values.
    ///
    /// Array selectors require non-negative integral values.
    pub fn parse(kind: Option<&str>, values: &[f64]) -> Result<Self> {
        match kind.unwrap_or("Array") {
            "Array" => values
                .iter()
                .map(|&v| {
                    if v >= 0.0 && v.fract() == 0.0 && v <= usize::MAX as f64 {
                        Ok(v as usize)
                    } else {
                        Err(Error::argument(format!("'{}' is not a time index", v)))
                    }
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Array),
            "Time" => Ok(Self::Time(values.to_vec())),
            other => Err(Error::argument(format!(
                "unknown selector kind '{}', expected Array or Time",
                other
            ))),
        }
    }

    /// Resolve to time-axis indices against `times`.
    pub fn indices(&self, times: &NumericArray) -> Result<Vec<usize>> {
        let count = times.shape().first().copied().unwrap_or(0);
        match self {
            Self::Array(indices) => {
                if let Some(&index) = indices.iter().find(|&&i| i >= count) {
                    return Err(Error::IndexOutOfBounds { index, count });
                }
                Ok(indices.clone())
            }
            Self::Time(wanted) => {
                let starts = bin_starts(times);
                Ok(starts
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| wanted.contains(*t))
                    .map(|(i, _)| i)
                    .collect())
            }
        }
    }
}

impl From<Vec<usize>> for TimeSelector {
    fn from(indices: Vec<usize>) -> Self {
        Self::Array(indices)
    }
}

/// First column of 2-D times, or the times themselves when 1-D.
fn bin_starts(times: &NumericArray) -> Vec<f64> {
    let times = times.to_f64();
    match times.shape() {
        [_] => times.iter().copied().collect(),
        [_, 0, ..] => Vec::new(),
        _ => times.index_axis(Axis(1), 0).iter().copied().collect(),
    }
}

impl GeoData {
    /// A new container restricted to the selected time bins.
    ///
    /// Times and every value field are copied along the time axis; the
    /// locations, coordinate system, sensor location and attributes are
    /// carried over unchanged.
    pub fn timeslice(&self, selector: &TimeSelector) -> Result<GeoData> {
        let indices = selector.indices(&self.times)?;
        tracing::debug!(kept = indices.len(), of = self.num_times(), "time slice");

        let mut out = self.clone();
        out.times = self.times.select(Axis(0), &indices);
        out.values = self
            .values
            .iter()
            .map(|(name, array)| (name.clone(), array.select(Axis(1), &indices)))
            .collect();
        Ok(out)
    }
}
