use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::optics::{MeasurementError, RadiometricConverter};

/// One row of a profiler table, already unpacked from the instrument export
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProfileRecord {
    pub cast_id: String,
    pub station: String,
    pub timestamp: NaiveDateTime,
    pub wavelength: u32, // nm
    pub depth: f64,      // m, positive down
    pub value: f64,      // instrument energy unit
}

/// One row of the surface reference radiometer table
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SurfaceRecord {
    pub timestamp: NaiveDateTime,
    pub wavelength: u32,
    pub value: f64,
}

/// Index of a fixed-width depth interval: `floor(depth / width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DepthBin(pub u32);

impl DepthBin {
    pub fn from_depth(depth: f64, width: f64) -> Self {
        DepthBin((depth / width).floor().max(0.0) as u32)
    }

    /// Upper edge is exclusive
    pub fn bounds_m(&self, width: f64) -> (f64, f64) {
        let lower = self.0 as f64 * width;
        (lower, lower + width)
    }
}

impl fmt::Display for DepthBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bin {}", self.0)
    }
}

/// Profile measurement converted to quantum flux.
///
/// Fields are private so the derived flux can't drift from the raw value
/// once the sample is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSample {
    cast_id: String,
    station: String,
    day: NaiveDate,
    wavelength: u32,
    depth: f64,
    radiometric_value: f64,
    quantum_flux: f64,
}

impl ProfileSample {
    pub fn from_record(
        record: &ProfileRecord,
        converter: &RadiometricConverter,
    ) -> Result<Self, MeasurementError> {
        if !record.depth.is_finite() || record.depth < 0.0 {
            return Err(MeasurementError::InvalidMeasurement {
                value: record.depth,
                wavelength: record.wavelength,
                reason: "depth must be finite and non-negative",
            });
        }

        let quantum_flux = converter.convert(record.value, record.wavelength)?;

        Ok(Self {
            cast_id: record.cast_id.clone(),
            station: record.station.clone(),
            day: record.timestamp.date(),
            wavelength: record.wavelength,
            depth: record.depth,
            radiometric_value: record.value,
            quantum_flux,
        })
    }

    pub fn cast_id(&self) -> &str {
        &self.cast_id
    }

    pub fn station(&self) -> &str {
        &self.station
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn wavelength(&self) -> u32 {
        self.wavelength
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn radiometric_value(&self) -> f64 {
        self.radiometric_value
    }

    pub fn quantum_flux(&self) -> f64 {
        self.quantum_flux
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::Instrument;

    fn record(depth: f64, value: f64) -> ProfileRecord {
        ProfileRecord {
            cast_id: "c001".to_string(),
            station: "BB-3".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2023, 7, 14)
                .unwrap()
                .and_hms_opt(23, 50, 0)
                .unwrap(),
            wavelength: 490,
            depth,
            value,
        }
    }

    #[test]
    fn test_sample_from_record() {
        let converter = RadiometricConverter::new(Instrument::Cops);
        let sample = ProfileSample::from_record(&record(12.0, 100.0), &converter).unwrap();

        assert_eq!(sample.day(), NaiveDate::from_ymd_opt(2023, 7, 14).unwrap());
        assert_eq!(sample.station(), "BB-3");
        assert_eq!(sample.cast_id(), "c001");
        assert_eq!(sample.radiometric_value(), 100.0);
        assert!((sample.quantum_flux() - 490.0 * 0.836e-2).abs() < 1e-12);
    }

    #[test]
    fn test_negative_depth_is_invalid() {
        let converter = RadiometricConverter::new(Instrument::Cops);
        assert!(ProfileSample::from_record(&record(-0.5, 100.0), &converter).is_err());
        assert!(ProfileSample::from_record(&record(f64::NAN, 100.0), &converter).is_err());
    }

    #[test]
    fn test_depth_bin_floors() {
        assert_eq!(DepthBin::from_depth(0.0, 5.0), DepthBin(0));
        assert_eq!(DepthBin::from_depth(4.999, 5.0), DepthBin(0));
        assert_eq!(DepthBin::from_depth(5.0, 5.0), DepthBin(1));
        assert_eq!(DepthBin::from_depth(27.3, 5.0), DepthBin(5));
        assert_eq!(DepthBin(5).bounds_m(5.0), (25.0, 30.0));
    }
}
