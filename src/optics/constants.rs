//! Physical constants used by the light-field reconstruction
//!
//! The values are kept as named constants so they can be traced and
//! validated against the literature independently of the code using them.

/// Energy to quantum flux conversion factor.
///
/// Converts a spectral irradiance in W m^-2 nm^-1 at wavelength λ (nm) into
/// µmol photons m^-2 s^-1 nm^-1:
///
/// `q = E * λ * 0.836e-2`
///
/// The factor is `1e-9 / (h * c * N_A) * 1e6` with h the Planck constant,
/// c the speed of light and N_A the Avogadro number.
pub const QUANTUM_CONVERSION_FACTOR: f64 = 0.836e-2;

/// Fraction of the downwelling surface irradiance that crosses the air-sea
/// interface. Applied once at z = 0 before the attenuation law.
pub const REFLECTANCE_FACTOR: f64 = 0.97;

/// Default width of the depth bins used to localise the attenuation fit (m)
pub const DEFAULT_DEPTH_BIN_WIDTH_M: f64 = 5.0;

/// Default width of the surface time buckets (minutes)
pub const DEFAULT_BUCKET_WIDTH_MINUTES: u32 = 5;

/// Minimum coefficient of determination for an attenuation fit to be kept.
/// The comparison is strict: a fit with exactly this value is discarded.
pub const DEFAULT_MIN_R_SQUARED: f64 = 0.9;

/// Minimum number of usable samples in a depth bin to attempt a fit
pub const DEFAULT_MIN_FIT_SAMPLES: usize = 4;
