//! Optical conversions and constants
//!
//! Instrument units, the energy to quantum flux conversion and the physical
//! constants of the attenuation model.

pub mod constants;
pub mod instrument;
pub mod radiometry;

pub use constants::*;
pub use instrument::{Instrument, InstrumentParseError};
pub use radiometry::{MeasurementError, RadiometricConverter, quantum_flux};
