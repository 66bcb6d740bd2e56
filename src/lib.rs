//! Reconstruction of a time and depth resolved underwater light field
//!
//! Vertical radiometer casts provide diffuse attenuation coefficients per
//! wavelength and depth bin, a surface radiometer provides the incident
//! irradiance through time. The two are combined with an exponential
//! attenuation law on a regular (time, depth) grid.
//!
//! ```rust
//! use photic::config::Config;
//! use photic::field::FieldProcessor;
//!
//! let processor = FieldProcessor::new(Config::default());
//! let field = processor.process(&[], &[]);
//! assert!(field.cells.is_empty());
//! ```

pub mod config;
pub mod field;
pub mod optics;
pub mod readers;
pub mod time_bucket;
pub mod utils;
pub mod writers;
