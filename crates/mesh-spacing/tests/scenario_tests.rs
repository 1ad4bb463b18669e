use approx::assert_relative_eq;

use mesh_spacing::{
    series_sum, solve_geometric, solve_or_uniform, solve_uniform, Anchor, DistributionKind,
    Infeasibility, MeshDistribution, Section, SectionSet, SpacingConfig, SpacingError,
};

// ── Infeasibility ───────────────────────────────────────────────────────────

#[test]
fn equal_bounds_are_infeasible() {
    let err = solve_geometric(1.0, 0.6, 0.6, Anchor::MinAtStart, &SpacingConfig::default()).unwrap_err();
    assert!(matches!(err, SpacingError::Infeasible(Infeasibility::MinNotBelowMax { .. })));
}

#[test]
fn bounds_longer_than_interval_are_infeasible() {
    let err = solve_geometric(1.0, 0.6, 0.6 + 1e-9, Anchor::MinAtStart, &SpacingConfig::default())
        .unwrap_err();
    assert!(matches!(err, SpacingError::Infeasible(Infeasibility::ExceedsLength { .. })));
}

// ── Degenerate bounds through the fallback policy ───────────────────────────

#[test]
fn degenerate_bounds_fall_back_to_eleven_nodes() {
    let outcome = solve_or_uniform(1.0, 0.1, 0.1, Anchor::MinAtStart, &SpacingConfig::default()).unwrap();
    assert!(outcome.fell_back);
    assert_eq!(outcome.distribution.kind(), DistributionKind::Uniform);
    assert_eq!(outcome.distribution.node_count(), 11);
    for size in outcome.distribution.cell_sizes(1.0) {
        assert_relative_eq!(size, 0.1);
    }
}

// ── Distributor default meshing ─────────────────────────────────────────────

#[test]
fn distributor_default_meshing_converges() {
    let (hmin, hmax) = (1.2e-5, 2.4e-5);
    let config = SpacingConfig::default();
    let d = solve_geometric(1.0, hmin, hmax, Anchor::MinAtStart, &config).unwrap();

    let n = d.node_count();
    let r = d.rate();
    assert!(n >= 3);
    assert!(n <= 83_335, "node count {n} beyond the uniform seed");
    assert!(r >= 1.0);
    assert!(hmin * r.powi(n as i32 - 2) <= hmax * (1.0 + 1e-9));
    assert!(series_sum(d.h1rel(), n, r, config.precision) <= 1.0);
}

#[test]
fn uniform_cells_fit_interval() {
    let d = solve_uniform(0.75, 0.1, &SpacingConfig::default()).unwrap();
    assert_eq!(d.node_count(), 9);
    let total: f64 = d.cell_sizes(0.75).iter().sum();
    assert_relative_eq!(total, 0.75, epsilon = 1e-12);
}

#[test]
fn geometric_cells_stay_within_interval() {
    let d = solve_geometric(0.5, 0.001, 0.02, Anchor::MinAtEnd, &SpacingConfig::default()).unwrap();
    let sizes = d.cell_sizes(0.5);
    assert_eq!(sizes.len(), d.cell_count());
    assert!(sizes.first().unwrap() > sizes.last().unwrap());
    let total: f64 = sizes.iter().sum();
    assert!(total <= 0.5 * (1.0 + 1e-6));
}

// ── Sections and replay ─────────────────────────────────────────────────────

#[test]
fn sections_replay_against_new_lengths() {
    let config = SpacingConfig::default();
    let mut set = SectionSet::new();
    let inlet = set.add(Section::new("l_i", 0.02).unwrap()).unwrap();
    let wall = set.add(Section::new("l_s", 0.004).unwrap()).unwrap();

    set.get_mut(inlet)
        .unwrap()
        .distribute_geometric(0.0001, 0.001, Anchor::MinAtEnd, &config)
        .unwrap();
    set.get_mut(wall).unwrap().distribute_uniform(0.0001, &config).unwrap();

    let longer = set.get(inlet).unwrap().resized(0.04, 1.0, &config).unwrap();
    let original = set.get(inlet).unwrap().distribution().unwrap();
    let replayed = longer.distribution().unwrap();
    assert_eq!(replayed.kind(), DistributionKind::Geometric2);
    // Same relative sizes on a longer edge means larger absolute cells,
    // so the node count is unchanged.
    assert_eq!(replayed.node_count(), original.node_count());

    let wall_record = set.get(wall).unwrap().distribution().unwrap().export(config.precision);
    let refined = MeshDistribution::reimport(&wall_record, 0.004, 0.5, &config).unwrap();
    assert_eq!(refined.node_count(), 81);
}

#[test]
fn non_positive_length_is_invalid_input() {
    assert!(matches!(
        solve_uniform(-2.0, 0.1, &SpacingConfig::default()),
        Err(SpacingError::InvalidInput { .. })
    ));
}
