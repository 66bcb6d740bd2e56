//! Diffuse attenuation coefficient (Kd) estimation from vertical profiles
//!
//! Irradiance in a homogeneous layer decays as `E(z) = E(z0) * exp(-Kd * (z - z0))`,
//! so `ln E` is linear in depth with slope `-Kd`. Each cast is cut into
//! fixed-width depth bins and a straight line is fitted to `ln E` against
//! depth in every (day, station, wavelength, bin) group.
//!
//! A fit is only kept when it is well constrained: enough samples, depths
//! that actually vary, and a coefficient of determination above the
//! configured threshold. A spurious Kd would propagate to every depth of the
//! reconstructed field, so sparse coverage is preferred to a poor estimate.
//! Rejected groups leave no trace in the output besides the run statistics.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::field::sample::{DepthBin, ProfileSample};

/// Composite key of a regression group. The derived ordering (day, station,
/// wavelength, bin) is the iteration order of [`AttenuationEstimates`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EstimateKey {
    pub day: NaiveDate,
    pub station: String,
    pub wavelength: u32,
    pub depth_bin: DepthBin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttenuationEstimate {
    pub day: NaiveDate,
    pub station: String,
    pub wavelength: u32,
    pub depth_bin: DepthBin,
    /// Kd in m^-1, positive when irradiance decreases with depth
    pub coefficient: f64,
    pub r_squared: f64,
    pub sample_count: usize,
}

impl AttenuationEstimate {
    pub fn key(&self) -> EstimateKey {
        EstimateKey {
            day: self.day,
            station: self.station.clone(),
            wavelength: self.wavelength,
            depth_bin: self.depth_bin,
        }
    }
}

/// Reasons a regression group does not produce an estimate
#[derive(Debug, Error, PartialEq)]
pub enum FitError {
    #[error("insufficient data: {found} usable samples, at least {required} required")]
    InsufficientData { found: usize, required: usize },
    #[error("all samples share the same depth")]
    DegenerateDepth,
    #[error("fit rejected: r² = {r_squared} does not exceed {threshold}")]
    RejectedFit { r_squared: f64, threshold: f64 },
}

/// Ordinary least squares line `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// NaN when `y` is constant
    pub r_squared: f64,
    pub n: usize,
}

pub fn linear_regression(points: &[(f64, f64)]) -> Result<LinearFit, FitError> {
    let n = points.len();
    if n < 2 {
        return Err(FitError::InsufficientData {
            found: n,
            required: 2,
        });
    }

    let first_x = points[0].0;
    if points.iter().all(|&(x, _)| x == first_x) {
        return Err(FitError::DegenerateDepth);
    }

    let nf = n as f64;
    let mean_x = points.iter().map(|&(x, _)| x).sum::<f64>() / nf;
    let mean_y = points.iter().map(|&(_, y)| y).sum::<f64>() / nf;

    let (sxx, sxy, syy) = points.iter().fold((0.0, 0.0, 0.0), |(sxx, sxy, syy), &(x, y)| {
        let dx = x - mean_x;
        let dy = y - mean_y;
        (sxx + dx * dx, sxy + dx * dy, syy + dy * dy)
    });

    if sxx <= 0.0 {
        return Err(FitError::DegenerateDepth);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = if syy > 0.0 {
        ((sxy * sxy) / (sxx * syy)).min(1.0)
    } else {
        f64::NAN
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
        n,
    })
}

/// Counters describing what the estimator dropped and why
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EstimationStats {
    pub groups: usize,
    pub non_positive_flux: usize,
    pub insufficient_data: usize,
    pub degenerate_depth: usize,
    pub rejected_fits: usize,
    pub negative_coefficients: usize,
}

/// Valid estimates of a run, ordered by [`EstimateKey`]
#[derive(Debug, Clone, Default)]
pub struct AttenuationEstimates {
    by_key: BTreeMap<EstimateKey, AttenuationEstimate>,
    depth_bin_width_m: f64,
    stats: EstimationStats,
}

impl AttenuationEstimates {
    /// Builds a set from already validated estimates.
    pub fn from_estimates(
        estimates: impl IntoIterator<Item = AttenuationEstimate>,
        depth_bin_width_m: f64,
    ) -> Self {
        Self {
            by_key: estimates.into_iter().map(|e| (e.key(), e)).collect(),
            depth_bin_width_m,
            stats: EstimationStats::default(),
        }
    }

    pub fn get(&self, key: &EstimateKey) -> Option<&AttenuationEstimate> {
        self.by_key.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttenuationEstimate> {
        self.by_key.values()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn depth_bin_width_m(&self) -> f64 {
        self.depth_bin_width_m
    }

    pub fn stats(&self) -> &EstimationStats {
        &self.stats
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AttenuationEstimator {
    depth_bin_width_m: f64,
    min_r_squared: f64,
    min_fit_samples: usize,
}

impl AttenuationEstimator {
    pub fn new(config: &Config) -> Self {
        Self {
            depth_bin_width_m: config.depth_bin_width_m(),
            min_r_squared: config.min_r_squared(),
            min_fit_samples: config.min_fit_samples(),
        }
    }

    /// Fits one group of `(depth, ln(flux))` points and applies the quality gates.
    pub fn fit_group(&self, points: &[(f64, f64)]) -> Result<LinearFit, FitError> {
        if points.len() < self.min_fit_samples {
            return Err(FitError::InsufficientData {
                found: points.len(),
                required: self.min_fit_samples,
            });
        }

        let fit = linear_regression(points)?;

        if fit.r_squared.is_nan() || fit.r_squared <= self.min_r_squared {
            return Err(FitError::RejectedFit {
                r_squared: fit.r_squared,
                threshold: self.min_r_squared,
            });
        }

        Ok(fit)
    }

    pub fn estimate(&self, samples: &[ProfileSample]) -> AttenuationEstimates {
        let mut stats = EstimationStats::default();
        let mut groups: BTreeMap<EstimateKey, Vec<(f64, f64)>> = BTreeMap::new();

        for sample in samples {
            let key = EstimateKey {
                day: sample.day(),
                station: sample.station().to_string(),
                wavelength: sample.wavelength(),
                depth_bin: DepthBin::from_depth(sample.depth(), self.depth_bin_width_m),
            };
            let points = groups.entry(key).or_default();

            // ln is undefined, the sample is left out but the group still counts
            if sample.quantum_flux() <= 0.0 {
                stats.non_positive_flux += 1;
                continue;
            }
            points.push((sample.depth(), sample.quantum_flux().ln()));
        }

        stats.groups = groups.len();

        let fits: Vec<(EstimateKey, usize, Result<LinearFit, FitError>)> = groups
            .into_par_iter()
            .map(|(key, points)| {
                let fit = self.fit_group(&points);
                (key, points.len(), fit)
            })
            .collect();

        let mut by_key = BTreeMap::new();
        for (key, sample_count, fit) in fits {
            match fit {
                Ok(fit) => {
                    let coefficient = -fit.slope;
                    if coefficient < 0.0 {
                        stats.negative_coefficients += 1;
                        warn!(
                            day = %key.day,
                            station = %key.station,
                            wavelength = key.wavelength,
                            depth_bin = key.depth_bin.0,
                            coefficient,
                            "Negative attenuation coefficient, irradiance increases with depth"
                        );
                    }

                    let estimate = AttenuationEstimate {
                        day: key.day,
                        station: key.station.clone(),
                        wavelength: key.wavelength,
                        depth_bin: key.depth_bin,
                        coefficient,
                        r_squared: fit.r_squared,
                        sample_count,
                    };
                    by_key.insert(key, estimate);
                }
                Err(err) => {
                    match err {
                        FitError::InsufficientData { .. } => stats.insufficient_data += 1,
                        FitError::DegenerateDepth => stats.degenerate_depth += 1,
                        FitError::RejectedFit { .. } => stats.rejected_fits += 1,
                    }
                    debug!(
                        day = %key.day,
                        station = %key.station,
                        wavelength = key.wavelength,
                        depth_bin = key.depth_bin.0,
                        "No estimate: {}",
                        err
                    );
                }
            }
        }

        info!(
            groups = stats.groups,
            estimates = by_key.len(),
            insufficient = stats.insufficient_data,
            degenerate = stats.degenerate_depth,
            rejected = stats.rejected_fits,
            "Attenuation estimation done"
        );

        AttenuationEstimates {
            by_key,
            depth_bin_width_m: self.depth_bin_width_m,
            stats,
        }
    }
}
