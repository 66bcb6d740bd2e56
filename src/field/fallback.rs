use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::field::attenuation::AttenuationEstimates;
use crate::field::sample::DepthBin;

/// Deepest reliable coefficient of a (day, wavelength), used for depth bins
/// that have no estimate of their own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackCoefficient {
    pub day: NaiveDate,
    pub wavelength: u32,
    pub depth_bin: DepthBin,
    pub station: String,
    pub coefficient: f64,
}

/// Fallback coefficients keyed by (day, wavelength). A missing key means no
/// fallback is available, never a zero coefficient.
#[derive(Debug, Clone, Default)]
pub struct FallbackMap {
    by_key: BTreeMap<(NaiveDate, u32), FallbackCoefficient>,
}

impl FallbackMap {
    pub fn get(&self, day: NaiveDate, wavelength: u32) -> Option<&FallbackCoefficient> {
        self.by_key.get(&(day, wavelength))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FallbackCoefficient> {
        self.by_key.values()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Picks, for each (day, wavelength), the estimate with the greatest depth bin.
///
/// Estimates are visited in key order (day, station, wavelength, bin) and
/// only a strictly deeper bin replaces the current pick. When two stations
/// reach the same deepest bin, the station sorting first is kept.
pub fn compose(estimates: &AttenuationEstimates) -> FallbackMap {
    let mut by_key: BTreeMap<(NaiveDate, u32), FallbackCoefficient> = BTreeMap::new();

    for estimate in estimates.iter() {
        let candidate = FallbackCoefficient {
            day: estimate.day,
            wavelength: estimate.wavelength,
            depth_bin: estimate.depth_bin,
            station: estimate.station.clone(),
            coefficient: estimate.coefficient,
        };

        match by_key.entry((estimate.day, estimate.wavelength)) {
            Entry::Vacant(entry) => {
                entry.insert(candidate);
            }
            Entry::Occupied(mut entry) => {
                if candidate.depth_bin > entry.get().depth_bin {
                    entry.insert(candidate);
                }
            }
        }
    }

    FallbackMap { by_key }
}
