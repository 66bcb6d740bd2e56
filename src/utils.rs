use serde::Serialize;
use tracing::info;

use crate::field::{CoefficientSource, LightField};

/// Irradiance statistics over the cells of a reconstructed field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSummary {
    pub cells: usize,
    pub own_bin_cells: usize,
    pub fallback_cells: usize,
    pub min_irradiance: f64,
    pub max_irradiance: f64,
    pub mean_irradiance: f64,
}

impl FieldSummary {
    /// `None` for an empty field
    pub fn from_field(field: &LightField) -> Option<Self> {
        if field.cells.is_empty() {
            return None;
        }

        let values = field.cells.iter().map(|c| c.irradiance);
        let own_bin_cells = field
            .cells
            .iter()
            .filter(|c| c.coefficient_source == CoefficientSource::OwnBin)
            .count();

        Some(Self {
            cells: field.cells.len(),
            own_bin_cells,
            fallback_cells: field.cells.len() - own_bin_cells,
            min_irradiance: values.clone().fold(f64::INFINITY, f64::min),
            max_irradiance: values.clone().fold(f64::NEG_INFINITY, f64::max),
            mean_irradiance: values.sum::<f64>() / field.cells.len() as f64,
        })
    }
}

pub fn log_field_statistics(field: &LightField) {
    let diagnostics = &field.diagnostics;

    info!(
        "Profile records: {}, dropped as invalid: {}",
        diagnostics.profile_records, diagnostics.invalid_samples
    );
    info!(
        "Regression groups: {}, estimates: {}, fallbacks: {}",
        diagnostics.estimation.groups, diagnostics.estimates, diagnostics.fallbacks
    );

    match FieldSummary::from_field(field) {
        Some(summary) => {
            info!(
                "Grid cells: {} ({} own bin, {} fallback), {} dropped",
                summary.cells,
                summary.own_bin_cells,
                summary.fallback_cells,
                diagnostics.extrapolation.dropped_cells
            );
            info!("  Min: {:.4} µmol photons m−2 s−1 nm−1", summary.min_irradiance);
            info!("  Max: {:.4} µmol photons m−2 s−1 nm−1", summary.max_irradiance);
            info!("  Mean: {:.4} µmol photons m−2 s−1 nm−1", summary.mean_irradiance);
        }
        None => info!("No grid cell could be reconstructed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{AttenuationEstimates, FallbackMap, GridCell, RunDiagnostics};
    use chrono::NaiveDate;

    fn cell(depth: f64, irradiance: f64, source: CoefficientSource) -> GridCell {
        let day = NaiveDate::from_ymd_opt(2023, 7, 14).unwrap();
        GridCell {
            time_bucket: day.and_hms_opt(12, 0, 0).unwrap(),
            day,
            wavelength: 490,
            depth,
            irradiance,
            effective_coefficient: 0.1,
            coefficient_source: source,
        }
    }

    fn field(cells: Vec<GridCell>) -> LightField {
        LightField {
            cells,
            estimates: AttenuationEstimates::default(),
            fallbacks: FallbackMap::default(),
            diagnostics: RunDiagnostics::default(),
        }
    }

    #[test]
    fn test_summary_statistics() {
        let field = field(vec![
            cell(0.0, 9.0, CoefficientSource::OwnBin),
            cell(5.0, 6.0, CoefficientSource::Fallback),
            cell(10.0, 3.0, CoefficientSource::Fallback),
        ]);
        let summary = FieldSummary::from_field(&field).unwrap();

        assert_eq!(summary.cells, 3);
        assert_eq!(summary.own_bin_cells, 1);
        assert_eq!(summary.fallback_cells, 2);
        assert_eq!(summary.min_irradiance, 3.0);
        assert_eq!(summary.max_irradiance, 9.0);
        assert_eq!(summary.mean_irradiance, 6.0);
    }

    #[test]
    fn test_empty_field_has_no_summary() {
        assert!(FieldSummary::from_field(&field(Vec::new())).is_none());
    }
}
