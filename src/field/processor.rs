use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Display;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::field::attenuation::{AttenuationEstimates, AttenuationEstimator, EstimationStats};
use crate::field::extrapolate::{ExtrapolationStats, FieldExtrapolator, GridCell};
use crate::field::fallback::{FallbackMap, compose};
use crate::field::sample::{ProfileRecord, ProfileSample, SurfaceRecord};
use crate::field::surface::{AggregationStats, SurfaceAggregator};
use crate::optics::RadiometricConverter;

/// What a run kept and dropped at every stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunDiagnostics {
    pub profile_records: usize,
    pub invalid_samples: usize,
    pub estimation: EstimationStats,
    pub estimates: usize,
    pub fallbacks: usize,
    pub surface: AggregationStats,
    pub extrapolation: ExtrapolationStats,
}

/// Result of a complete run. `cells` may be empty, sparse data is never an error.
#[derive(Debug, Clone)]
pub struct LightField {
    pub cells: Vec<GridCell>,
    pub estimates: AttenuationEstimates,
    pub fallbacks: FallbackMap,
    pub diagnostics: RunDiagnostics,
}

#[derive(Debug, Clone)]
pub struct FieldProcessor {
    config: Config,
}

impl FieldProcessor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Converts profile records to quantum flux, dropping invalid ones.
    /// Returns the samples and the number of records dropped.
    pub fn convert_profiles(&self, records: &[ProfileRecord]) -> (Vec<ProfileSample>, usize) {
        let converter = RadiometricConverter::new(self.config.profile_instrument());

        let converted: Vec<_> = records
            .par_iter()
            .map(|record| ProfileSample::from_record(record, &converter))
            .collect();

        let mut samples = Vec::with_capacity(converted.len());
        let mut invalid = 0;
        for result in converted {
            match result {
                Ok(sample) => samples.push(sample),
                Err(e) => {
                    debug!("Dropping profile sample: {}", e);
                    invalid += 1;
                }
            }
        }

        if invalid > 0 {
            warn!(
                invalid,
                total = records.len(),
                instrument = %converter.instrument(),
                "Profile samples dropped during conversion"
            );
        }

        (samples, invalid)
    }

    pub fn process(&self, profiles: &[ProfileRecord], surface: &[SurfaceRecord]) -> LightField {
        info!("Reconstructing light field with {}", self);

        let (samples, invalid_samples) = self.convert_profiles(profiles);
        let profile_wavelengths: BTreeSet<u32> = samples.iter().map(|s| s.wavelength()).collect();

        let estimates = AttenuationEstimator::new(&self.config).estimate(&samples);
        let fallbacks = compose(&estimates);
        debug!(fallbacks = fallbacks.len(), "Fallback coefficients composed");

        let (buckets, surface_stats) =
            SurfaceAggregator::new(&self.config).aggregate(surface, &profile_wavelengths);

        let (cells, extrapolation_stats) = FieldExtrapolator::new(&self.config).extrapolate(
            &buckets,
            &estimates,
            &fallbacks,
            self.config.depth_grid(),
        );

        let diagnostics = RunDiagnostics {
            profile_records: profiles.len(),
            invalid_samples,
            estimation: *estimates.stats(),
            estimates: estimates.len(),
            fallbacks: fallbacks.len(),
            surface: surface_stats,
            extrapolation: extrapolation_stats,
        };

        LightField {
            cells,
            estimates,
            fallbacks,
            diagnostics,
        }
    }
}

impl Display for FieldProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let grid = self.config.depth_grid();
        write!(
            f,
            "FieldProcessor {{ instrument: {}, depth bins: {} m, buckets: {} min, grid: {}..{} m by {} m }}",
            self.config.profile_instrument(),
            self.config.depth_bin_width_m(),
            self.config.bucket_width_minutes(),
            grid.min_m(),
            grid.max_m(),
            grid.step_m()
        )
    }
}
