#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use photic::field::{ProfileRecord, SurfaceRecord};
use photic::optics::QUANTUM_CONVERSION_FACTOR;

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 7, d).unwrap()
}

pub fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    day(d).and_hms_opt(h, m, 0).unwrap()
}

/// Profile record in SI units whose quantum flux is `flux`
pub fn profile(station: &str, d: u32, wavelength: u32, depth: f64, flux: f64) -> ProfileRecord {
    ProfileRecord {
        cast_id: format!("{station}-{d}"),
        station: station.to_string(),
        timestamp: at(d, 11, 0),
        wavelength,
        depth,
        value: flux / (wavelength as f64 * QUANTUM_CONVERSION_FACTOR),
    }
}

/// Noise-free exponential cast over `depths`
pub fn cast(station: &str, d: u32, wavelength: u32, k: f64, depths: &[f64]) -> Vec<ProfileRecord> {
    depths
        .iter()
        .map(|&z| profile(station, d, wavelength, z, 800.0 * (-k * z).exp()))
        .collect()
}

pub fn surface(timestamp: NaiveDateTime, wavelength: u32, value: f64) -> SurfaceRecord {
    SurfaceRecord {
        timestamp,
        wavelength,
        value,
    }
}
