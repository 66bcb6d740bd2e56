use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Radiometers whose exports can be fed to the pipeline. Each one reports
/// spectral irradiance in its own energy unit.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instrument {
    /// Biospherical C-OPS profiler, µW cm^-2 nm^-1
    #[serde(rename(deserialize = "cops"))]
    Cops,
    /// TriOS RAMSES radiometer, mW m^-2 nm^-1
    #[serde(rename(deserialize = "trios"))]
    Trios,
    /// Already in W m^-2 nm^-1
    #[serde(rename(deserialize = "si"))]
    Si,
}

#[derive(Debug, Error)]
#[error("invalid instrument: {0} (expected one of cops, trios, si)")]
pub struct InstrumentParseError(pub String);

impl Instrument {
    /// Multiplier bringing the native unit to W m^-2 nm^-1
    pub fn si_scale(&self) -> f64 {
        match self {
            // 1 µW cm^-2 = 1e-6 W / 1e-4 m^2
            Instrument::Cops => 1e-2,
            Instrument::Trios => 1e-3,
            Instrument::Si => 1.0,
        }
    }

    /// Wavelength range (nm, inclusive) covered by the instrument calibration
    pub fn calibrated_band(&self) -> (u32, u32) {
        match self {
            Instrument::Cops => (305, 880),
            Instrument::Trios => (320, 950),
            Instrument::Si => (300, 1100),
        }
    }

    pub fn is_calibrated(&self, wavelength: u32) -> bool {
        let (lower, upper) = self.calibrated_band();
        (lower..=upper).contains(&wavelength)
    }

    pub fn to_si(&self, value: f64) -> f64 {
        value * self.si_scale()
    }
}

impl FromStr for Instrument {
    type Err = InstrumentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cops" => Ok(Instrument::Cops),
            "trios" => Ok(Instrument::Trios),
            "si" => Ok(Instrument::Si),
            _ => Err(InstrumentParseError(s.to_string())),
        }
    }
}

impl Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instrument::Cops => write!(f, "C-OPS"),
            Instrument::Trios => write!(f, "TriOS"),
            Instrument::Si => write!(f, "SI"),
        }
    }
}
