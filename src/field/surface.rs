use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::config::Config;
use crate::field::sample::SurfaceRecord;
use crate::optics::RadiometricConverter;
use crate::time_bucket::floor_to_bucket;

/// Mean surface quantum flux over one time bucket and wavelength
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceBucket {
    pub time_bucket: NaiveDateTime,
    pub day: NaiveDate,
    pub wavelength: u32,
    pub mean_surface_flux: f64,
    pub sample_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregationStats {
    pub readings: usize,
    pub non_finite: usize,
    pub invalid_measurements: usize,
    pub unshared_wavelength: usize,
    pub buckets: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct SurfaceAggregator {
    bucket_width: Duration,
    converter: Option<RadiometricConverter>,
}

impl SurfaceAggregator {
    pub fn new(config: &Config) -> Self {
        Self {
            bucket_width: config.bucket_width(),
            converter: config.surface_instrument().map(RadiometricConverter::new),
        }
    }

    pub fn with_bucket_width(bucket_width: Duration) -> Self {
        Self {
            bucket_width,
            converter: None,
        }
    }

    /// Averages surface readings over fixed time buckets.
    ///
    /// Only wavelengths present in `profile_wavelengths` are kept, any other
    /// bucket could never be matched with an attenuation coefficient. Buckets
    /// are returned ordered by time then wavelength.
    pub fn aggregate(
        &self,
        records: &[SurfaceRecord],
        profile_wavelengths: &BTreeSet<u32>,
    ) -> (Vec<SurfaceBucket>, AggregationStats) {
        let mut stats = AggregationStats {
            readings: records.len(),
            ..Default::default()
        };
        let mut sums: BTreeMap<(NaiveDateTime, u32), (f64, usize)> = BTreeMap::new();

        for record in records {
            if !profile_wavelengths.contains(&record.wavelength) {
                stats.unshared_wavelength += 1;
                continue;
            }

            if !record.value.is_finite() {
                stats.non_finite += 1;
                continue;
            }

            let flux = match &self.converter {
                Some(converter) => match converter.convert(record.value, record.wavelength) {
                    Ok(flux) => flux,
                    Err(e) => {
                        debug!("Dropping surface reading at {}: {}", record.timestamp, e);
                        stats.invalid_measurements += 1;
                        continue;
                    }
                },
                None if record.value < 0.0 => {
                    debug!("Dropping negative surface reading at {}", record.timestamp);
                    stats.invalid_measurements += 1;
                    continue;
                }
                None => record.value,
            };

            let bucket = floor_to_bucket(record.timestamp, self.bucket_width);
            let entry = sums.entry((bucket, record.wavelength)).or_insert((0.0, 0));
            entry.0 += flux;
            entry.1 += 1;
        }

        let buckets: Vec<SurfaceBucket> = sums
            .into_iter()
            .map(|((time_bucket, wavelength), (sum, count))| SurfaceBucket {
                time_bucket,
                day: time_bucket.date(),
                wavelength,
                mean_surface_flux: sum / count as f64,
                sample_count: count,
            })
            .collect();

        stats.buckets = buckets.len();
        info!(
            readings = stats.readings,
            buckets = stats.buckets,
            unshared_wavelength = stats.unshared_wavelength,
            non_finite = stats.non_finite,
            "Surface aggregation done"
        );

        (buckets, stats)
    }
}
