use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::field::{AttenuationEstimates, GridCell};

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to write {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Attenuation estimate with its depth bin expressed in metres
#[derive(Debug, Serialize)]
struct EstimateRow<'a> {
    day: NaiveDate,
    station: &'a str,
    wavelength: u32,
    depth_bin_start_m: f64,
    depth_bin_end_m: f64,
    coefficient: f64,
    r_squared: f64,
    sample_count: usize,
}

fn write_rows<T: Serialize>(
    path: &Path,
    rows: impl IntoIterator<Item = T>,
) -> Result<usize, WriteError> {
    let csv_error = |source: csv::Error| WriteError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    let mut count = 0;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
        count += 1;
    }
    writer.flush().map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(count)
}

pub fn write_grid_cells(path: &Path, cells: &[GridCell]) -> Result<(), WriteError> {
    let count = write_rows(path, cells)?;
    info!("Wrote {} grid cells to {}", count, path.display());
    Ok(())
}

pub fn write_estimates(path: &Path, estimates: &AttenuationEstimates) -> Result<(), WriteError> {
    let width = estimates.depth_bin_width_m();
    let rows = estimates.iter().map(|e| {
        let (start, end) = e.depth_bin.bounds_m(width);
        EstimateRow {
            day: e.day,
            station: &e.station,
            wavelength: e.wavelength,
            depth_bin_start_m: start,
            depth_bin_end_m: end,
            coefficient: e.coefficient,
            r_squared: e.r_squared,
            sample_count: e.sample_count,
        }
    });

    let count = write_rows(path, rows)?;
    info!("Wrote {} attenuation estimates to {}", count, path.display());
    Ok(())
}
