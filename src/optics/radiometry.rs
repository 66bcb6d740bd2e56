//! Radiometric to quantum unit conversion
//!
//! Profilers report downwelling irradiance as an energy flux per unit
//! wavelength. Attenuation fits and the reconstructed field are expressed in
//! quantum flux (µmol photons m^-2 s^-1 nm^-1), which is what primary
//! production models consume.

use thiserror::Error;

use crate::optics::Instrument;
use crate::optics::constants::QUANTUM_CONVERSION_FACTOR;

#[derive(Debug, Error, PartialEq)]
pub enum MeasurementError {
    #[error("invalid measurement: {reason} (value: {value}, wavelength: {wavelength} nm)")]
    InvalidMeasurement {
        value: f64,
        wavelength: u32,
        reason: &'static str,
    },
}

/// Converts a spectral irradiance already in W m^-2 nm^-1 into quantum flux.
pub fn quantum_flux(si_value: f64, wavelength: u32) -> f64 {
    si_value * wavelength as f64 * QUANTUM_CONVERSION_FACTOR
}

/// Converter bound to the instrument the measurements come from.
#[derive(Debug, Clone, Copy)]
pub struct RadiometricConverter {
    instrument: Instrument,
}

impl RadiometricConverter {
    pub fn new(instrument: Instrument) -> Self {
        Self { instrument }
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    /// Normalises `radiometric_value` to SI then converts it to quantum flux.
    ///
    /// Negative or non-finite values and wavelengths outside the instrument
    /// calibration are rejected. Callers are expected to drop the sample and
    /// carry on with the rest of the batch.
    pub fn convert(&self, radiometric_value: f64, wavelength: u32) -> Result<f64, MeasurementError> {
        let invalid = |reason: &'static str| MeasurementError::InvalidMeasurement {
            value: radiometric_value,
            wavelength,
            reason,
        };

        if !radiometric_value.is_finite() {
            return Err(invalid("non-finite value"));
        }

        if radiometric_value < 0.0 {
            return Err(invalid("negative value"));
        }

        if !self.instrument.is_calibrated(wavelength) {
            return Err(invalid("wavelength outside calibrated band"));
        }

        Ok(quantum_flux(self.instrument.to_si(radiometric_value), wavelength))
    }
}
