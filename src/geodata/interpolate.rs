//! Spatial re-sampling of a container onto new locations.

use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView2};

use super::GeoData;
use crate::coords::{self, CoordinateSystem};
use crate::core::NumericArray;
use crate::interp::{self, Interpolant, Method};
use crate::util::{Error, Result};

impl GeoData {
    /// A new container with every value field re-sampled onto
    /// `new_locations` (one row per point, expressed in `new_system`).
    ///
    /// The current locations are converted into `new_system` first. Axes
    /// that are constant over either point set are dropped before
    /// interpolating; a single query point keeps the axes the samples vary
    /// along. When all samples share one location, queries at that location
    /// take its values. Each time bin is interpolated independently; points
    /// the method cannot reach take `fill_value`. The result stores
    /// `new_locations` in full and is tagged with `new_system`.
    pub fn interpolate(
        &self,
        new_locations: ArrayView2<'_, f64>,
        new_system: &CoordinateSystem,
        method: Method,
        fill_value: f64,
    ) -> Result<GeoData> {
        let current = self.sample_locations.to_f64_2d("dataloc")?;
        let old = coords::convert(current.view(), &self.coordinate_system, new_system)?;
        if old.ncols() != new_locations.ncols() {
            return Err(Error::argument(format!(
                "new locations have {} coordinates, {} locations have {}",
                new_locations.ncols(),
                new_system,
                old.ncols()
            )));
        }

        let num_new = new_locations.nrows();
        let num_times = self.num_times();
        let mut values = BTreeMap::new();

        if num_new == 0 {
            for name in self.values.keys() {
                values.insert(name.clone(), NumericArray::from(Array2::<f64>::zeros((0, num_times))));
            }
        } else {
            let keep = interp::interpolation_axes(old.view(), new_locations);
            let plan = if keep.iter().any(|&k| k) {
                let dropped: Vec<usize> = (0..keep.len()).filter(|&k| !keep[k]).collect();
                if !dropped.is_empty() {
                    tracing::debug!(?dropped, "dropping constant axes");
                }
                let old_reduced = interp::reduce_axes(old.view(), &keep);
                let new_reduced = interp::reduce_axes(new_locations, &keep);
                Interpolant::new(old_reduced.view(), new_reduced.view(), method)?
            } else {
                Interpolant::coincident(old.view(), new_locations, method)?
            };

            for (name, array) in &self.values {
                let samples = array.to_f64_2d(name)?;
                let mut out = Array2::<f64>::zeros((num_new, num_times));
                for (t, column) in samples.columns().into_iter().enumerate() {
                    let resampled = plan.evaluate(column, fill_value)?;
                    out.column_mut(t).assign(&resampled);
                }
                values.insert(name.clone(), NumericArray::from(out));
            }
        }

        tracing::debug!(
            %method,
            fields = values.len(),
            from = self.num_locations(),
            to = num_new,
            coords = %new_system,
            "interpolated container"
        );

        let mut out = self.clone();
        out.values = values;
        out.sample_locations = NumericArray::from(new_locations.to_owned());
        out.coordinate_system = new_system.clone();
        Ok(out)
    }

    /// [`GeoData::interpolate`], replacing `self` with the result.
    ///
    /// On error `self` is left untouched.
    pub fn interpolate_in_place(
        &mut self,
        new_locations: ArrayView2<'_, f64>,
        new_system: &CoordinateSystem,
        method: Method,
        fill_value: f64,
    ) -> Result<()> {
        *self = self.interpolate(new_locations, new_system, method, fill_value)?;
        Ok(())
    }
}
