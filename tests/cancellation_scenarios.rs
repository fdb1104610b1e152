//! Hand-checked simplification scenarios.
//!
//! Each complex here is small enough that its filtration, persistence pairs
//! and final critical set can be worked out on paper:
//!
//! - a path `0-2-1` with one non-trivial vertex–edge pair of persistence 1
//! - a single triangle, where every pair has zero persistence
//! - the boundary of a tetrahedron, whose top triangle is essential
//! - a grid with a shallow second minimum
//! - a loop `0-1-2` whose gradient leads both ends of `{1,2}` down to vertex 0
//!
//! Run with `RUST_LOG=discrete_morse=debug` to see every cancellability test.

#![forbid(unsafe_code)]

use discrete_morse::prelude::*;

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

fn path_complex() -> SimplicialComplex {
    ComplexBuilder::new(&[0.0, 2.0, 1.0])
        .edge([0, 1])
        .edge([1, 2])
        .build()
        .unwrap()
}

fn log_lines(report: &CancellationReport) -> Vec<String> {
    let mut buffer = Vec::new();
    report.write_log(&mut buffer).unwrap();
    String::from_utf8(buffer)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

// =============================================================================
// PATH 0-2-1
// =============================================================================

#[test]
fn test_path_below_threshold_keeps_second_minimum() {
    init_tracing();
    let mut complex = path_complex();
    let result = simplify(&mut complex, &SimplificationConfig::new(0.5)).unwrap();

    assert_eq!(result.pairs.min_saddle().len(), 2);
    assert_eq!(result.report.visited(), 2);
    assert_eq!(result.report.attempted(), 1);
    assert_eq!(result.report.cancelled(), 1);
    assert_eq!(
        log_lines(&result.report),
        vec!["Index: 01, Persistence: 0 + 0e, Cancellable: Yes (trivial)"]
    );

    let counts = validate_morse_counts(&complex).unwrap();
    assert_eq!(counts, CriticalCounts { minima: 2, saddles: 1, maxima: 0 });
}

#[test]
fn test_path_above_threshold_merges_minima() {
    init_tracing();
    let mut complex = path_complex();
    let v: Vec<VertexKey> = complex.vertices().map(|(k, _)| k).collect();
    let e12 = complex.edge_between(v[1], v[2]).unwrap();

    let result = simplify(&mut complex, &SimplificationConfig::new(1.0)).unwrap();

    assert_eq!(
        log_lines(&result.report),
        vec![
            "Index: 01, Persistence: 0 + 0e, Cancellable: Yes (trivial)",
            "Index: 01, Persistence: 1 + 1e, Cancellable: Yes",
        ]
    );
    assert_eq!(complex.critical_simplices(), vec![Simplex::Vertex(v[0])]);
    assert_eq!(result.gradient.edge_of_vertex(v[2]), Some(e12));
    assert_eq!(result.gradient.len(), 2);
}

#[test]
fn test_threshold_tolerance_depends_on_ordering() {
    let threshold = 1.0 - 1e-9;

    let mut tolerant = path_complex();
    let result = simplify(&mut tolerant, &SimplificationConfig::new(threshold)).unwrap();
    assert_eq!(result.report.cancelled(), 2);

    let mut exact = path_complex();
    let config = SimplificationConfigBuilder::default()
        .persistence_threshold(threshold)
        .ordering(PairOrdering::Exact)
        .build()
        .unwrap();
    let result = simplify(&mut exact, &config).unwrap();
    assert_eq!(result.report.cancelled(), 1);
    assert_eq!(exact.critical_count(), 3);
}

// =============================================================================
// SINGLE TRIANGLE
// =============================================================================

#[test]
fn test_single_triangle_reduces_to_global_minimum() {
    init_tracing();
    let mut complex = ComplexBuilder::new(&[0.0, 1.0, 2.0])
        .triangle([0, 1, 2])
        .build()
        .unwrap();
    let v0 = complex.vertices().next().unwrap().0;

    let result = simplify(&mut complex, &SimplificationConfig::new(0.0)).unwrap();

    assert_eq!(result.pairs.min_saddle().len(), 2);
    assert_eq!(result.pairs.saddle_max().len(), 1);
    assert_eq!(result.pairs.essential(), &[Simplex::Vertex(v0)]);
    assert_eq!(
        log_lines(&result.report),
        vec![
            "Index: 01, Persistence: 0 + 0e, Cancellable: Yes (trivial)",
            "Index: 01, Persistence: 0 + 0e, Cancellable: Yes (trivial)",
            "Index: 12, Persistence: 0 + 0e 0, Cancellable: Yes (trivial)",
        ]
    );
    assert_eq!(complex.critical_simplices(), vec![Simplex::Vertex(v0)]);
}

// =============================================================================
// TETRAHEDRON BOUNDARY
// =============================================================================

#[test]
fn test_sphere_keeps_one_minimum_and_one_maximum() {
    let mut complex = ComplexBuilder::new(&[0.0, 1.0, 2.0, 3.0])
        .triangles([[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]])
        .build()
        .unwrap();
    assert_eq!(complex.euler_characteristic(), 2);

    let result = simplify(&mut complex, &SimplificationConfig::new(10.0)).unwrap();

    assert_eq!(result.pairs.essential().len(), 2);
    let counts = validate_morse_counts(&complex).unwrap();
    assert_eq!(counts, CriticalCounts { minima: 1, saddles: 0, maxima: 1 });

    let top = complex.triangles().nth(3).unwrap().0;
    assert!(complex.is_critical(Simplex::Triangle(top)));
}

// =============================================================================
// GRID WITH TWO MINIMA
// =============================================================================

const TWO_BASINS: [f64; 16] = [
    0.0, 1.0, 1.0, 1.0, //
    1.0, 5.0, 5.0, 1.0, //
    1.0, 5.0, 5.0, 1.0, //
    1.0, 1.0, 1.0, 0.5, //
];

#[test]
fn test_shallow_basin_survives_small_threshold() {
    let mut complex = generate_grid_complex(4, 4, &TWO_BASINS).unwrap();
    simplify(&mut complex, &SimplificationConfig::new(0.25)).unwrap();
    assert_eq!(CriticalCounts::from_complex(&complex).minima, 2);
}

#[test]
fn test_shallow_basin_cancelled_by_larger_threshold() {
    let mut complex = generate_grid_complex(4, 4, &TWO_BASINS).unwrap();
    let result = simplify(&mut complex, &SimplificationConfig::new(1.0)).unwrap();

    let counts = validate_morse_counts(&complex).unwrap();
    assert_eq!(counts.minima, 1);
    assert!(
        result
            .report
            .records()
            .iter()
            .any(|r| r.outcome == AttemptOutcome::Cancelled)
    );
}

#[test]
fn test_pair_dump_lists_vertex_edge_pairs_first() {
    let mut complex = generate_grid_complex(4, 4, &TWO_BASINS).unwrap();
    let result = simplify(&mut complex, &SimplificationConfig::new(0.0)).unwrap();

    let mut buffer = Vec::new();
    result.pairs.write_pairs(&mut buffer).unwrap();
    let dump = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = dump.lines().collect();

    assert_eq!(lines.len(), result.pairs.len());
    let split = result.pairs.min_saddle().len();
    assert!(lines[..split].iter().all(|l| l.starts_with("Vertex Edge ")));
    assert!(lines[split..].iter().all(|l| l.starts_with("Edge Triangle ")));
}

// =============================================================================
// LOOP WITH TWO DESCENTS
// =============================================================================

#[test]
fn test_pair_with_two_descents_is_left_in_place() {
    init_tracing();
    let mut complex = ComplexBuilder::new(&[0.0, 1.0, 2.0])
        .edge([0, 1])
        .edge([0, 2])
        .edge([1, 2])
        .build()
        .unwrap();
    let filtration = Filtration::build(&mut complex);
    let v: Vec<VertexKey> = complex.vertices().map(|(k, _)| k).collect();
    let e01 = complex.edge_between(v[0], v[1]).unwrap();
    let e02 = complex.edge_between(v[0], v[2]).unwrap();
    let e12 = complex.edge_between(v[1], v[2]).unwrap();

    // v1 -> {0,1} -> v0 and v2 -> {0,2} -> v0.
    let mut gradient = GradientField::new();
    gradient.add_vertex_edge(v[1], e01).unwrap();
    gradient.add_vertex_edge(v[2], e02).unwrap();
    complex.reset_critical_simplices();
    for simplex in [
        Simplex::Vertex(v[1]),
        Simplex::Edge(e01),
        Simplex::Vertex(v[2]),
        Simplex::Edge(e02),
    ] {
        complex.remove_critical(simplex);
    }

    let index_of = |s: Simplex| filtration.iter().position(|&f| f == s).unwrap();
    let pairing = IndexPairing {
        pairs: vec![(index_of(Simplex::Vertex(v[0])), index_of(Simplex::Edge(e12)))],
        essential: vec![],
    };
    let mut pairs = PersistencePairs::from_pairing(&complex, &filtration, &pairing).unwrap();

    let critical_before = complex.critical_simplices();
    let matching_before: Vec<(VertexKey, EdgeKey)> = gradient.vertex_edge_pairs().collect();

    let report = cancel_persistence_pairs(
        &mut pairs,
        &mut complex,
        &mut gradient,
        &SimplificationConfig::new(2.0),
    )
    .unwrap();

    assert_eq!(report.attempted(), 1);
    assert_eq!(report.cancelled(), 0);
    assert_eq!(
        report.records()[0].outcome,
        AttemptOutcome::NotCancellable(Obstruction::PathNotUnique)
    );
    assert!(log_lines(&report)[0].ends_with("Cancellable: No, Reason: path not unique"));

    assert_eq!(complex.critical_simplices(), critical_before);
    assert_eq!(
        complex.critical_simplices(),
        vec![Simplex::Vertex(v[0]), Simplex::Edge(e12)]
    );
    assert_eq!(gradient.len(), 2);
    assert_eq!(gradient.vertex_edge_pairs().collect::<Vec<_>>(), matching_before);
    assert_eq!(gradient.partner(Simplex::Vertex(v[0])), None);
    assert_eq!(gradient.partner(Simplex::Edge(e12)), None);
}
