use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("depth_bin_width_m must be a finite value greater than 0, got {0}")]
    DepthBinWidth(f64),
    #[error("bucket_width_minutes must be greater than 0")]
    BucketWidth,
    #[error("min_r_squared must be within [0, 1), got {0}")]
    MinRSquared(f64),
    #[error("min_fit_samples must be at least 3, got {0}")]
    MinFitSamples(usize),
    #[error("depth grid bounds must be finite and non-negative (min: {min}, max: {max})")]
    DepthGridBounds { min: f64, max: f64 },
    #[error("depth grid max ({max}) cannot be lower than min ({min})")]
    DepthGridOrder { min: f64, max: f64 },
    #[error("depth grid step must be a finite value greater than 0, got {0}")]
    DepthGridStep(f64),
    #[error("depth grid would hold {count} depths, at most {max} are allowed")]
    DepthGridSize { count: f64, max: usize },
    #[error("reflectance_factor must be within (0, 1], got {0}")]
    ReflectanceFactor(f64),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}
