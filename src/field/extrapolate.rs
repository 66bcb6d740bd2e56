use chrono::{NaiveDate, NaiveDateTime};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::info;

use crate::config::{Config, DepthGrid};
use crate::field::attenuation::AttenuationEstimates;
use crate::field::fallback::FallbackMap;
use crate::field::sample::DepthBin;
use crate::field::surface::SurfaceBucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoefficientSource {
    /// Estimate fitted in the depth bin containing the cell
    OwnBin,
    /// Deepest estimate of the day and wavelength
    Fallback,
}

/// One (time, wavelength, depth) point of the reconstructed field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub time_bucket: NaiveDateTime,
    pub day: NaiveDate,
    pub wavelength: u32,
    pub depth: f64,
    pub irradiance: f64,
    pub effective_coefficient: f64,
    pub coefficient_source: CoefficientSource,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtrapolationStats {
    pub cells: usize,
    pub own_bin_cells: usize,
    pub fallback_cells: usize,
    /// Cells with neither an own-bin nor a fallback coefficient
    pub dropped_cells: usize,
}

/// Own-bin coefficients with the station dropped from the key. When several
/// stations cover the same bin, the one sorting first is used.
struct OwnBinIndex {
    coefficients: HashMap<(NaiveDate, u32, DepthBin), f64>,
    depth_bin_width_m: f64,
}

impl OwnBinIndex {
    fn new(estimates: &AttenuationEstimates) -> Self {
        let mut coefficients = HashMap::with_capacity(estimates.len());
        for estimate in estimates.iter() {
            if let Entry::Vacant(entry) =
                coefficients.entry((estimate.day, estimate.wavelength, estimate.depth_bin))
            {
                entry.insert(estimate.coefficient);
            }
        }

        Self {
            coefficients,
            depth_bin_width_m: estimates.depth_bin_width_m(),
        }
    }

    fn get(&self, day: NaiveDate, wavelength: u32, depth: f64) -> Option<f64> {
        let bin = DepthBin::from_depth(depth, self.depth_bin_width_m);
        self.coefficients.get(&(day, wavelength, bin)).copied()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldExtrapolator {
    reflectance_factor: f64,
}

impl FieldExtrapolator {
    pub fn new(config: &Config) -> Self {
        Self {
            reflectance_factor: config.reflectance_factor(),
        }
    }

    /// `Ed(z) = t * Ed(0+) * exp(-Kd * z)` with `t` the air-sea transmission
    pub fn irradiance(&self, surface_flux: f64, coefficient: f64, depth: f64) -> f64 {
        self.reflectance_factor * surface_flux * (-coefficient * depth).exp()
    }

    /// Crosses every surface bucket with every depth of `depth_grid`.
    ///
    /// Cells take the coefficient of their own depth bin when it exists,
    /// otherwise the fallback of their (day, wavelength). Cells resolving
    /// neither are not emitted. Output is ordered like `buckets`, then by
    /// increasing depth.
    ///
    /// Irradiance only decays with depth when one coefficient applies to
    /// the whole column. Mixing own-bin and fallback coefficients can make
    /// a deeper cell brighter than a shallower one.
    pub fn extrapolate(
        &self,
        buckets: &[SurfaceBucket],
        estimates: &AttenuationEstimates,
        fallbacks: &FallbackMap,
        depth_grid: &DepthGrid,
    ) -> (Vec<GridCell>, ExtrapolationStats) {
        let own_bins = OwnBinIndex::new(estimates);

        let per_bucket: Vec<(Vec<GridCell>, usize)> = buckets
            .par_iter()
            .map(|bucket| {
                let fallback = fallbacks.get(bucket.day, bucket.wavelength);
                let mut cells = Vec::with_capacity(depth_grid.len());
                let mut dropped = 0;

                for depth in depth_grid {
                    let resolved = own_bins
                        .get(bucket.day, bucket.wavelength, depth)
                        .map(|k| (k, CoefficientSource::OwnBin))
                        .or_else(|| fallback.map(|f| (f.coefficient, CoefficientSource::Fallback)));

                    let Some((coefficient, source)) = resolved else {
                        dropped += 1;
                        continue;
                    };

                    cells.push(GridCell {
                        time_bucket: bucket.time_bucket,
                        day: bucket.day,
                        wavelength: bucket.wavelength,
                        depth,
                        irradiance: self.irradiance(bucket.mean_surface_flux, coefficient, depth),
                        effective_coefficient: coefficient,
                        coefficient_source: source,
                    });
                }

                (cells, dropped)
            })
            .collect();

        let mut stats = ExtrapolationStats::default();
        let mut cells = Vec::with_capacity(per_bucket.iter().map(|(c, _)| c.len()).sum());
        for (bucket_cells, dropped) in per_bucket {
            stats.dropped_cells += dropped;
            cells.extend(bucket_cells);
        }

        stats.cells = cells.len();
        stats.own_bin_cells = cells
            .iter()
            .filter(|c| c.coefficient_source == CoefficientSource::OwnBin)
            .count();
        stats.fallback_cells = stats.cells - stats.own_bin_cells;

        info!(
            cells = stats.cells,
            own_bin = stats.own_bin_cells,
            fallback = stats.fallback_cells,
            dropped = stats.dropped_cells,
            "Field extrapolation done"
        );

        (cells, stats)
    }
}
