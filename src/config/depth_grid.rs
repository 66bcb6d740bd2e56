use crate::config::ConfigError;

/// Upper bound on the number of depths of a grid
pub const MAX_GRID_DEPTHS: usize = 1_000_000;

/// Regular depth sequence the reconstructed field is evaluated on (metres, positive down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthGrid {
    min_m: f64,
    max_m: f64,
    step_m: f64,
    len: usize,
}

impl Default for DepthGrid {
    fn default() -> Self {
        Self {
            min_m: 0.0,
            max_m: 1500.0,
            step_m: 5.0,
            len: 301,
        }
    }
}

impl DepthGrid {
    pub fn new(min_m: f64, max_m: f64, step_m: f64) -> Result<Self, ConfigError> {
        if !min_m.is_finite() || !max_m.is_finite() || min_m < 0.0 || max_m < 0.0 {
            return Err(ConfigError::DepthGridBounds {
                min: min_m,
                max: max_m,
            });
        }

        if max_m < min_m {
            return Err(ConfigError::DepthGridOrder {
                min: min_m,
                max: max_m,
            });
        }

        if !step_m.is_finite() || step_m <= 0.0 {
            return Err(ConfigError::DepthGridStep(step_m));
        }

        // Small tolerance so that 0..1500 by 5 keeps 1500 despite rounding
        let count = ((max_m - min_m) / step_m + 1e-9).floor() + 1.0;
        if !count.is_finite() || count > MAX_GRID_DEPTHS as f64 {
            return Err(ConfigError::DepthGridSize {
                count,
                max: MAX_GRID_DEPTHS,
            });
        }

        Ok(Self {
            min_m,
            max_m,
            step_m,
            len: count as usize,
        })
    }

    pub fn min_m(&self) -> f64 {
        self.min_m
    }

    pub fn max_m(&self) -> f64 {
        self.max_m
    }

    pub fn step_m(&self) -> f64 {
        self.step_m
    }

    /// Number of depths in the grid, both ends included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> DepthGridIter {
        DepthGridIter {
            grid: *self,
            index: 0,
        }
    }

    pub fn depths(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

/// Walks the grid from `min_m` to `max_m`. Depths are computed from the
/// index rather than accumulated, so long grids do not drift.
#[derive(Debug, Clone)]
pub struct DepthGridIter {
    grid: DepthGrid,
    index: usize,
}

impl Iterator for DepthGridIter {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.grid.len() {
            let depth = self.grid.min_m + self.index as f64 * self.grid.step_m;
            self.index += 1;
            Some(depth)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DepthGridIter {}

impl<'a> IntoIterator for &'a DepthGrid {
    type Item = f64;
    type IntoIter = DepthGridIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
