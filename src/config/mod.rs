use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::optics::Instrument;
use crate::optics::constants::{
    DEFAULT_BUCKET_WIDTH_MINUTES, DEFAULT_DEPTH_BIN_WIDTH_M, DEFAULT_MIN_FIT_SAMPLES,
    DEFAULT_MIN_R_SQUARED, REFLECTANCE_FACTOR,
};

pub mod depth_grid;
pub mod error;

pub use depth_grid::DepthGrid;
pub use error::ConfigError;

/// Locations of the tabular inputs and outputs, only used by the binary
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InputFiles {
    /// Glob pattern matching one or more profile tables
    pub profiles: String,
    pub surface: String,
    pub output: String,
    pub estimates_output: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    depth_bin_width_m: f64,
    bucket_width_minutes: u32,
    min_r_squared: f64,
    min_fit_samples: usize,
    depth_grid: DepthGrid,
    profile_instrument: Instrument,
    surface_instrument: Option<Instrument>,
    reflectance_factor: f64,
    inputs: Option<InputFiles>,
}

// Every field is optional in the JSON file. Missing values take their
// defaults, then the whole set is validated before a Config is built.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct ConfigHelper {
            depth_bin_width_m: Option<f64>,
            bucket_width_minutes: Option<u32>,
            min_r_squared: Option<f64>,
            min_fit_samples: Option<usize>,
            depth_grid: Option<DepthGridHelper>,
            profile_instrument: Option<Instrument>,
            surface_instrument: Option<Instrument>,
            inputs: Option<InputFiles>,
        }

        #[derive(Deserialize)]
        struct DepthGridHelper {
            min_m: f64,
            max_m: f64,
            step_m: f64,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let depth_grid = match helper.depth_grid {
            Some(grid) => DepthGrid::new(grid.min_m, grid.max_m, grid.step_m)
                .map_err(|e| D::Error::custom(format!("Invalid depth_grid: {}", e)))?,
            None => DepthGrid::default(),
        };

        let mut config = Config::new(
            helper.depth_bin_width_m.unwrap_or(DEFAULT_DEPTH_BIN_WIDTH_M),
            helper
                .bucket_width_minutes
                .unwrap_or(DEFAULT_BUCKET_WIDTH_MINUTES),
            helper.min_r_squared.unwrap_or(DEFAULT_MIN_R_SQUARED),
            helper.min_fit_samples.unwrap_or(DEFAULT_MIN_FIT_SAMPLES),
            depth_grid,
        )
        .map_err(D::Error::custom)?;

        if let Some(instrument) = helper.profile_instrument {
            config.profile_instrument = instrument;
        }
        config.surface_instrument = helper.surface_instrument;
        config.inputs = helper.inputs;

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            depth_bin_width_m: DEFAULT_DEPTH_BIN_WIDTH_M,
            bucket_width_minutes: DEFAULT_BUCKET_WIDTH_MINUTES,
            min_r_squared: DEFAULT_MIN_R_SQUARED,
            min_fit_samples: DEFAULT_MIN_FIT_SAMPLES,
            depth_grid: DepthGrid::default(),
            profile_instrument: Instrument::Cops,
            surface_instrument: None,
            reflectance_factor: REFLECTANCE_FACTOR,
            inputs: None,
        }
    }
}

impl Config {
    pub fn new(
        depth_bin_width_m: f64,
        bucket_width_minutes: u32,
        min_r_squared: f64,
        min_fit_samples: usize,
        depth_grid: DepthGrid,
    ) -> Result<Self, ConfigError> {
        if !depth_bin_width_m.is_finite() || depth_bin_width_m <= 0.0 {
            return Err(ConfigError::DepthBinWidth(depth_bin_width_m));
        }

        if bucket_width_minutes == 0 {
            return Err(ConfigError::BucketWidth);
        }

        if !(0.0..1.0).contains(&min_r_squared) {
            return Err(ConfigError::MinRSquared(min_r_squared));
        }

        // Two points always give a perfect line, three is the least that can fail
        if min_fit_samples < 3 {
            return Err(ConfigError::MinFitSamples(min_fit_samples));
        }

        Ok(Self {
            depth_bin_width_m,
            bucket_width_minutes,
            min_r_squared,
            min_fit_samples,
            depth_grid,
            ..Self::default()
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn with_profile_instrument(mut self, instrument: Instrument) -> Self {
        self.profile_instrument = instrument;
        self
    }

    pub fn with_surface_instrument(mut self, instrument: Option<Instrument>) -> Self {
        self.surface_instrument = instrument;
        self
    }

    pub fn with_inputs(mut self, inputs: InputFiles) -> Self {
        self.inputs = Some(inputs);
        self
    }

    /// Overrides the air-sea transmission factor. Only meant for tests, the
    /// factor is not read from configuration files.
    pub fn with_reflectance_factor(mut self, factor: f64) -> Result<Self, ConfigError> {
        if !factor.is_finite() || factor <= 0.0 || factor > 1.0 {
            return Err(ConfigError::ReflectanceFactor(factor));
        }
        self.reflectance_factor = factor;
        Ok(self)
    }

    pub fn depth_bin_width_m(&self) -> f64 {
        self.depth_bin_width_m
    }

    pub fn bucket_width_minutes(&self) -> u32 {
        self.bucket_width_minutes
    }

    pub fn bucket_width(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.bucket_width_minutes as i64)
    }

    pub fn min_r_squared(&self) -> f64 {
        self.min_r_squared
    }

    pub fn min_fit_samples(&self) -> usize {
        self.min_fit_samples
    }

    pub fn depth_grid(&self) -> &DepthGrid {
        &self.depth_grid
    }

    pub fn profile_instrument(&self) -> Instrument {
        self.profile_instrument
    }

    pub fn surface_instrument(&self) -> Option<Instrument> {
        self.surface_instrument
    }

    pub fn reflectance_factor(&self) -> f64 {
        self.reflectance_factor
    }

    pub fn inputs(&self) -> Option<&InputFiles> {
        self.inputs.as_ref()
    }
}
