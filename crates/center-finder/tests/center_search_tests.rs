//! End-to-end tests for vortex center finding on synthetic wind fields.

use center_finder::{
    find_center, CandidateOutcome, CandidateScorer, CenterFinderConfig, CenterResult, FirstGuess,
    GuessSource, SearchParams, SearchStatus,
};
use geodesy::{KernelKind, ReferenceKernel};
use ndarray::Array2;
use test_utils::{
    all_missing_wind, assert_approx_eq, blank_region, punch_hole, scenarios, RankineSpec,
    VortexCase,
};
use vortex_common::{GridIndex, LatLonGrid, VortexError, WindField};

fn load(spec: &RankineSpec) -> (VortexCase, WindField, LatLonGrid) {
    let case = spec.build();
    let wind = WindField::new(case.u.clone(), case.v.clone()).unwrap();
    let grid = LatLonGrid::new(case.lat.clone(), case.lon.clone()).unwrap();
    (case, wind, grid)
}

fn run(wind: &WindField, grid: &LatLonGrid, first_guess: Option<FirstGuess>) -> CenterResult {
    find_center(
        wind,
        grid,
        &SearchParams::default(),
        first_guess,
        &CenterFinderConfig::default(),
    )
    .unwrap()
}

fn bits(a: &Array2<f64>) -> Vec<u64> {
    a.iter().map(|v| v.to_bits()).collect()
}

// ============================================================================
// Synthetic Rankine vortex
// ============================================================================

#[test]
fn test_rankine_21x21_converges_to_center() {
    let (case, wind, grid) = load(&scenarios::RANKINE_21X21);
    let result = run(&wind, &grid, None);

    assert_eq!(result.status, SearchStatus::Converged);
    assert_eq!(result.center_index, Some(GridIndex::new(10, 10)));
    assert_eq!(result.center_lat, case.lat[[10, 10]]);
    assert_eq!(result.center_lon, case.lon[[10, 10]]);
    assert!(result.is_valid());

    assert_eq!(result.rmw_km, case.rmw_km);
    assert!(result.peak_tangential_wind > 35.0 && result.peak_tangential_wind <= case.vmax);

    // The whole grid lies within the coverage radius and every cell has wind
    assert_eq!(result.data_coverage, 1.0);
    assert_eq!(result.start_source, GuessSource::Vorticity);
    assert_eq!(result.smoothed_vorticity.dim(), (21, 21));
    assert!(result.min_error < 0.05);
}

#[test]
fn test_rankine_offset_converges_without_first_guess() {
    let (case, wind, grid) = load(&scenarios::RANKINE_OFFSET_41X41);
    let result = run(&wind, &grid, None);

    assert_eq!(result.status, SearchStatus::Converged);
    assert_eq!(result.center_index, Some(GridIndex::from(case.center)));
    assert_eq!(result.rmw_km, case.rmw_km);
}

#[test]
fn test_rankine_offset_converges_from_supplied_guess() {
    let (case, wind, grid) = load(&scenarios::RANKINE_OFFSET_41X41);
    let guess = FirstGuess::new(case.lon[[20, 20]], case.lat[[20, 20]]);
    let result = run(&wind, &grid, Some(guess));

    assert_eq!(result.start_source, GuessSource::Supplied);
    assert_eq!(result.start_index, GridIndex::new(20, 20));
    assert_eq!(result.status, SearchStatus::Converged);
    assert_eq!(result.center_index, Some(GridIndex::from(case.center)));
    // Vorticity is reported even when it was not used to start the search
    assert!(result.smoothed_vorticity.iter().any(|v| v.is_finite()));
}

#[test]
fn test_southern_hemisphere_placement() {
    let (case, wind, grid) = load(&scenarios::RANKINE_SOUTH_21X21);
    let result = run(&wind, &grid, None);

    assert_eq!(result.status, SearchStatus::Converged);
    assert_eq!(result.center_index, Some(GridIndex::from(case.center)));
    assert!(result.center_lat < 0.0);
    assert_eq!(result.rmw_km, case.rmw_km);
}

#[test]
fn test_exact_center_scores_near_zero() {
    let (case, _, grid) = load(&scenarios::RANKINE_21X21);
    let (mut u, mut v) = (case.u, case.v);
    u[[10, 10]] = f64::NAN;
    v[[10, 10]] = f64::NAN;
    let wind = WindField::new(u, v).unwrap();
    let config = CenterFinderConfig::default();
    let scorer = CandidateScorer::new(&wind, &grid, 8, &ReferenceKernel, &config);

    let score = |index: GridIndex| match scorer.score(index) {
        CandidateOutcome::Scored { aggregate, .. } => aggregate,
        other => panic!("{:?} not scored: {:?}", index, other),
    };

    let at_center = score(GridIndex::new(10, 10));
    assert!(at_center < 0.01, "center error {}", at_center);
    for neighbor in [GridIndex::new(10, 11), GridIndex::new(11, 10), GridIndex::new(9, 9)] {
        assert!(score(neighbor) > 0.1 + at_center);
    }
}

// ============================================================================
// Degenerate inputs
// ============================================================================

#[test]
fn test_all_missing_wind_does_not_raise() {
    let (case, _, grid) = load(&scenarios::RANKINE_21X21);
    let (u, v) = all_missing_wind(case.u.nrows(), case.u.ncols());
    let wind = WindField::new(u, v).unwrap();

    let result = run(&wind, &grid, None);
    assert_eq!(result.status, SearchStatus::NoValidCandidate);
    assert!(!result.is_valid());
    assert!(result.center_lon.is_nan());
    assert!(result.center_lat.is_nan());
    assert!(result.rmw_km.is_nan());
    assert!(result.peak_tangential_wind.is_nan());
    assert!(result.data_coverage.is_nan());
    assert!(result.center_index.is_none());
    assert!(result.diagnostics.is_none());
    assert_eq!(result.min_error, f64::INFINITY);
    assert_eq!(result.start_source, GuessSource::Midpoint);
    assert!(result.smoothed_vorticity.iter().all(|v| v.is_nan()));
}

#[test]
fn test_data_void_never_becomes_center() {
    let (case, _, grid) = load(&scenarios::RANKINE_21X21);
    let (mut u, mut v) = (case.u, case.v);
    punch_hole(&mut u, &mut v, case.center, 4.0);
    let wind = WindField::new(u, v).unwrap();

    let mut config = CenterFinderConfig::default();
    config.coverage_radius_km = 6.0;
    let start = FirstGuess::new(case.lon[[10, 10]], case.lat[[10, 10]]);

    let result = find_center(&wind, &grid, &SearchParams::default(), Some(start), &config).unwrap();
    assert_eq!(result.start_index, GridIndex::new(10, 10));
    assert_ne!(result.center_index, Some(GridIndex::new(10, 10)));
    // The center and its four direct neighbors see only the hole
    assert!(result.candidates_rejected >= 5);
}

#[test]
fn test_partial_data_gap_still_finds_center() {
    let (case, _, grid) = load(&scenarios::RANKINE_21X21);
    let (mut u, mut v) = (case.u, case.v);
    blank_region(&mut u, &mut v, 14..=20, 14..=20);
    let wind = WindField::new(u, v).unwrap();
    let start = FirstGuess::new(case.lon[[13, 7]], case.lat[[13, 7]]);

    let result = run(&wind, &grid, Some(start));
    assert_eq!(result.status, SearchStatus::Converged);
    assert_eq!(result.center_index, Some(GridIndex::new(10, 10)));
    assert_eq!(result.rmw_km, case.rmw_km);
    // 49 of 441 cells are blank, all within the coverage radius
    assert_approx_eq!(result.data_coverage, 392.0 / 441.0, 1e-12);
}

#[test]
fn test_shape_mismatch_is_rejected() {
    let (case, _, grid) = load(&scenarios::RANKINE_21X21);
    let u = case.u.slice(ndarray::s![.., ..20]).to_owned();
    let v = case.v.slice(ndarray::s![.., ..20]).to_owned();
    let wind = WindField::new(u, v).unwrap();

    let err = find_center(
        &wind,
        &grid,
        &SearchParams::default(),
        None,
        &CenterFinderConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, VortexError::InputShapeMismatch { .. }));
    assert!(err.is_input_error());
}

// ============================================================================
// Search parameter edge cases
// ============================================================================

#[test]
fn test_zero_spad_converges_in_place() {
    let (case, wind, grid) = load(&scenarios::RANKINE_21X21);
    let start = FirstGuess::new(case.lon[[4, 15]], case.lat[[4, 15]]);

    let result = find_center(
        &wind,
        &grid,
        &SearchParams::new(8, 0, 5),
        Some(start),
        &CenterFinderConfig::default(),
    )
    .unwrap();
    assert_eq!(result.status, SearchStatus::Converged);
    assert_eq!(result.center_index, Some(GridIndex::new(4, 15)));
    assert_eq!(result.iterations, 2);
    assert_eq!(result.candidates_scored, 1);
}

#[test]
fn test_single_iteration_cannot_converge() {
    let (_, wind, grid) = load(&scenarios::RANKINE_21X21);

    let result = find_center(
        &wind,
        &grid,
        &SearchParams::new(8, 6, 1),
        None,
        &CenterFinderConfig::default(),
    )
    .unwrap();
    assert_eq!(result.status, SearchStatus::BudgetExhausted);
    assert_eq!(result.iterations, 1);
    assert!(result.is_valid());
    assert!(result.rmw_km.is_nan());
}

#[test]
fn test_single_sector() {
    let (case, wind, grid) = load(&scenarios::RANKINE_21X21);

    let result = find_center(
        &wind,
        &grid,
        &SearchParams::new(1, 6, 5),
        None,
        &CenterFinderConfig::default(),
    )
    .unwrap();
    assert_eq!(result.center_index, Some(GridIndex::from(case.center)));
    assert_eq!(result.diagnostics.unwrap().sector_errors.len(), 1);
}

// ============================================================================
// Interchangeable execution paths
// ============================================================================

#[test]
fn test_execution_paths_are_identical() {
    let (_, wind, grid) = load(&scenarios::RANKINE_OFFSET_41X41);

    let mut results = Vec::new();
    for kernel in [KernelKind::Reference, KernelKind::Parallel] {
        for parallel_scoring in [false, true] {
            let config = CenterFinderConfig {
                kernel,
                parallel_scoring,
                ..CenterFinderConfig::default()
            };
            results.push(
                find_center(&wind, &grid, &SearchParams::default(), None, &config).unwrap(),
            );
        }
    }

    let baseline = &results[0];
    for other in &results[1..] {
        assert_eq!(other.status, baseline.status);
        assert_eq!(other.center_index, baseline.center_index);
        assert_eq!(other.iterations, baseline.iterations);
        assert_eq!(other.candidates_scored, baseline.candidates_scored);
        assert_eq!(other.min_error.to_bits(), baseline.min_error.to_bits());
        assert_eq!(other.rmw_km.to_bits(), baseline.rmw_km.to_bits());
        assert_eq!(
            other.peak_tangential_wind.to_bits(),
            baseline.peak_tangential_wind.to_bits()
        );
        assert_eq!(other.data_coverage.to_bits(), baseline.data_coverage.to_bits());
        assert_eq!(bits(&other.smoothed_vorticity), bits(&baseline.smoothed_vorticity));

        let (a, b) = (
            other.diagnostics.as_ref().unwrap(),
            baseline.diagnostics.as_ref().unwrap(),
        );
        assert_eq!(bits(&a.weighted_deviation), bits(&b.weighted_deviation));
    }
}
