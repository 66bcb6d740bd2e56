//! Light-field reconstruction
//!
//! Profiles give the attenuation coefficients, the surface radiometer gives
//! the time-resolved boundary condition, and the two are combined on a
//! regular (time, depth) grid:
//!
//! 1. [`attenuation`]: Kd per (day, station, wavelength, depth bin)
//! 2. [`fallback`]: deepest Kd per (day, wavelength)
//! 3. [`surface`]: surface flux averaged over time buckets
//! 4. [`extrapolate`]: `Ed(z, t) = 0.97 * Ed(0+, t) * exp(-Kd * z)`
//!
//! [`processor::FieldProcessor`] runs the stages in that order.

pub mod attenuation;
pub mod extrapolate;
pub mod fallback;
pub mod processor;
pub mod sample;
pub mod surface;

pub use attenuation::{
    AttenuationEstimate, AttenuationEstimates, AttenuationEstimator, EstimateKey, EstimationStats,
    FitError,
};
pub use extrapolate::{CoefficientSource, ExtrapolationStats, FieldExtrapolator, GridCell};
pub use fallback::{FallbackCoefficient, FallbackMap, compose};
pub use processor::{FieldProcessor, LightField, RunDiagnostics};
pub use sample::{DepthBin, ProfileRecord, ProfileSample, SurfaceRecord};
pub use surface::{AggregationStats, SurfaceAggregator, SurfaceBucket};
