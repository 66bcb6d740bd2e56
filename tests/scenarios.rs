//! End-to-end runs of the reconstruction on small synthetic missions.

mod common;

use approx::assert_relative_eq;
use common::{at, cast, day, profile, surface};
use photic::config::{Config, DepthGrid};
use photic::field::{CoefficientSource, DepthBin, FieldProcessor};
use photic::optics::Instrument;

fn processor(grid: DepthGrid) -> FieldProcessor {
    let config = Config::new(5.0, 5, 0.9, 4, grid)
        .unwrap()
        .with_profile_instrument(Instrument::Si);
    FieldProcessor::new(config)
}

#[test]
fn irradiance_at_25m_from_own_bin_coefficient() {
    let profiles = cast("A", 14, 490, 0.05, &[25.0, 26.0, 27.0, 28.0, 29.0]);
    let surface = vec![
        surface(at(14, 12, 1), 490, 9.0),
        surface(at(14, 12, 3), 490, 11.0),
    ];

    let field = processor(DepthGrid::new(0.0, 50.0, 5.0).unwrap()).process(&profiles, &surface);

    let cell = field
        .cells
        .iter()
        .find(|c| c.depth == 25.0)
        .expect("cell at 25 m");

    assert_eq!(cell.time_bucket, at(14, 12, 0));
    assert_eq!(cell.coefficient_source, CoefficientSource::OwnBin);
    assert_relative_eq!(cell.effective_coefficient, 0.05, epsilon = 1e-9);
    assert_relative_eq!(cell.irradiance, 0.97 * 10.0 * (-0.05f64 * 25.0).exp(), epsilon = 1e-9);
    assert!((cell.irradiance - 2.778).abs() < 2e-3);

    // The only estimate is also the fallback for every other depth
    assert_eq!(field.cells.len(), 11);
    assert_eq!(field.diagnostics.extrapolation.fallback_cells, 10);
}

#[test]
fn wavelength_without_estimate_yields_no_cells() {
    let mut profiles = cast("A", 14, 490, 0.1, &[0.0, 1.0, 2.0, 3.0, 4.0]);
    // 555 nm is observed but with too few samples to fit
    profiles.extend(cast("A", 14, 555, 0.1, &[0.0, 1.0, 2.0]));

    let surface = vec![
        surface(at(14, 12, 0), 490, 10.0),
        surface(at(14, 12, 0), 555, 10.0),
        // No cast at all on the 15th
        surface(at(15, 12, 0), 490, 10.0),
    ];

    let grid = DepthGrid::new(0.0, 100.0, 5.0).unwrap();
    let field = processor(grid).process(&profiles, &surface);

    assert!(field.cells.iter().all(|c| c.wavelength == 490 && c.day == day(14)));
    assert_eq!(field.cells.len(), grid.len());
    assert_eq!(field.diagnostics.surface.buckets, 3);
    assert_eq!(field.diagnostics.extrapolation.dropped_cells, 2 * grid.len());
    assert_eq!(field.diagnostics.estimation.insufficient_data, 1);
}

#[test]
fn fallback_comes_from_deepest_station_bin() {
    // Station A reaches the 10-15 m bin, station B the 30-35 m bin
    let mut profiles = cast("A", 14, 490, 0.12, &[10.0, 11.0, 12.0, 13.0, 14.0]);
    profiles.extend(cast("B", 14, 490, 0.04, &[30.0, 31.0, 32.0, 33.0, 34.0]));
    let surface = vec![surface(at(14, 9, 0), 490, 100.0)];

    let field = processor(DepthGrid::new(0.0, 60.0, 5.0).unwrap()).process(&profiles, &surface);

    let fallback = field.fallbacks.get(day(14), 490).unwrap();
    assert_eq!(fallback.depth_bin, DepthBin(6));
    assert_eq!(fallback.station, "B");
    assert_relative_eq!(fallback.coefficient, 0.04, epsilon = 1e-9);

    for cell in &field.cells {
        match cell.depth as u32 {
            10 => assert_relative_eq!(cell.effective_coefficient, 0.12, epsilon = 1e-9),
            _ => assert_relative_eq!(cell.effective_coefficient, 0.04, epsilon = 1e-9),
        }
    }
}

#[test]
fn noisy_and_invalid_profiles_degrade_coverage_without_failing() {
    let mut profiles = vec![
        profile("A", 14, 490, 0.0, 100.0),
        profile("A", 14, 490, 1.0, 5.0),
        profile("A", 14, 490, 2.0, 90.0),
        profile("A", 14, 490, 3.0, 3.0),
        profile("A", 14, 490, 4.0, 80.0),
    ];
    profiles.push(profile("A", 14, 490, f64::NAN, 10.0));
    profiles.push(profile("A", 14, 2000, 1.0, 10.0));

    let surface = vec![surface(at(14, 12, 0), 490, 10.0)];
    let field = processor(DepthGrid::default()).process(&profiles, &surface);

    assert!(field.cells.is_empty());
    assert!(field.estimates.is_empty());
    assert_eq!(field.diagnostics.invalid_samples, 2);
    assert_eq!(field.diagnostics.estimation.rejected_fits, 1);
}

#[test]
fn negative_coefficient_is_flagged_but_used() {
    let profiles = cast("A", 14, 490, -0.02, &[0.0, 1.0, 2.0, 3.0, 4.0]);
    let surface = vec![surface(at(14, 12, 0), 490, 10.0)];

    let field = processor(DepthGrid::new(0.0, 10.0, 5.0).unwrap()).process(&profiles, &surface);

    assert_eq!(field.diagnostics.estimation.negative_coefficients, 1);
    assert_eq!(field.cells.len(), 3);
    assert!(field.cells[2].irradiance > field.cells[0].irradiance);
}

#[test]
fn reflectance_override_scales_the_field() {
    let profiles = cast("A", 14, 490, 0.1, &[0.0, 1.0, 2.0, 3.0, 4.0]);
    let surface = vec![surface(at(14, 12, 0), 490, 10.0)];
    let config = Config::new(5.0, 5, 0.9, 4, DepthGrid::new(0.0, 0.0, 5.0).unwrap())
        .unwrap()
        .with_profile_instrument(Instrument::Si)
        .with_reflectance_factor(1.0)
        .unwrap();

    let field = FieldProcessor::new(config).process(&profiles, &surface);

    assert_relative_eq!(field.cells[0].irradiance, 10.0, epsilon = 1e-12);
}

#[test]
fn negative_surface_reading_is_dropped() {
    let profiles = cast("A", 14, 490, 0.1, &[0.0, 1.0, 2.0, 3.0, 4.0]);
    let surface = vec![
        surface(at(14, 12, 0), 490, -2.0),
        surface(at(14, 12, 10), 490, -2.0),
        surface(at(14, 12, 11), 490, 4.0),
    ];

    let field = processor(DepthGrid::new(0.0, 20.0, 5.0).unwrap()).process(&profiles, &surface);

    assert_eq!(field.diagnostics.surface.invalid_measurements, 2);
    assert_eq!(field.cells.len(), 5);
    assert!(field.cells.iter().all(|c| c.time_bucket == at(14, 12, 10)));
    assert!(field.cells.iter().all(|c| c.irradiance >= 0.0));
}
