//! Property-based tests for the simplification pipeline.
//!
//! ## Test Properties
//!
//! 1. **Critical count**: every cancellation removes exactly two critical simplices
//! 2. **Matching**: matched simplices are exactly the non-critical ones, and every
//!    gradient pair joins a simplex to one of its cofaces
//! 3. **Weak Morse equality**: c₀ − c₁ + c₂ = χ(K) after any threshold
//! 4. **Threshold**: no attempted pair exceeds δ
//! 5. **Determinism**: identical input gives an identical report

#![forbid(unsafe_code)]

use discrete_morse::prelude::*;
use proptest::prelude::*;

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

fn grid_dims() -> impl Strategy<Value = (usize, usize)> {
    (2usize..7, 2usize..7)
}

fn ordering() -> impl Strategy<Value = PairOrdering> {
    prop_oneof![Just(PairOrdering::Tolerant), Just(PairOrdering::Exact)]
}

fn config(threshold: f64, ordering: PairOrdering) -> SimplificationConfig {
    SimplificationConfigBuilder::default()
        .persistence_threshold(threshold)
        .ordering(ordering)
        .build()
        .unwrap()
}

// =============================================================================
// PROPERTY-BASED TESTS
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: critical count drops by two per cancellation and the
    /// gradient field holds one pair per cancellation.
    #[test]
    fn prop_critical_count_tracks_cancellations(
        (rows, cols) in grid_dims(),
        seed in any::<u64>(),
        threshold in 0.0f64..1.0,
        ordering in ordering(),
    ) {
        let mut complex = generate_random_grid_complex(rows, cols, seed).unwrap();
        let total = complex.number_of_simplices();
        let result = simplify(&mut complex, &config(threshold, ordering)).unwrap();

        prop_assert_eq!(complex.critical_count(), total - 2 * result.report.cancelled());
        prop_assert_eq!(result.gradient.len(), result.report.cancelled());
        prop_assert_eq!(result.report.visited(), result.pairs.len());
        prop_assert!(result.report.attempted() <= result.report.visited());
    }

    /// Property: the gradient field is a valid matching on the complex.
    #[test]
    fn prop_gradient_is_a_matching_of_faces(
        (rows, cols) in grid_dims(),
        seed in any::<u64>(),
        threshold in 0.0f64..1.0,
    ) {
        let mut complex = generate_random_grid_complex(rows, cols, seed).unwrap();
        let result = simplify(&mut complex, &SimplificationConfig::new(threshold)).unwrap();
        let gradient = &result.gradient;

        for (v, e) in gradient.vertex_edge_pairs() {
            prop_assert!(complex.edge_has_vertex(e, v));
            prop_assert_eq!(gradient.vertex_of_edge(e), Some(v));
            prop_assert!(gradient.triangle_of_edge(e).is_none());
        }
        for (e, t) in gradient.edge_triangle_pairs() {
            prop_assert!(complex.triangle_has_edge(t, e));
            prop_assert_eq!(gradient.edge_of_triangle(t), Some(e));
            prop_assert!(gradient.vertex_of_edge(e).is_none());
        }
        for simplex in complex.simplices() {
            prop_assert_ne!(gradient.is_matched(simplex), complex.is_critical(simplex));
        }
    }

    /// Property: the weak Morse equality survives simplification.
    #[test]
    fn prop_morse_counts_match_euler(
        (rows, cols) in grid_dims(),
        seed in any::<u64>(),
        threshold in 0.0f64..2.0,
        ordering in ordering(),
    ) {
        let mut complex = generate_random_grid_complex(rows, cols, seed).unwrap();
        simplify(&mut complex, &config(threshold, ordering)).unwrap();
        let counts = validate_morse_counts(&complex).unwrap();
        prop_assert_eq!(counts.alternating_sum(), 1);
        prop_assert!(counts.minima >= 1);
    }

    /// Property: only pairs within the threshold are attempted.
    #[test]
    fn prop_attempts_respect_threshold(
        (rows, cols) in grid_dims(),
        seed in any::<u64>(),
        threshold in 0.0f64..0.5,
        ordering in ordering(),
    ) {
        let mut complex = generate_random_grid_complex(rows, cols, seed).unwrap();
        let result = simplify(&mut complex, &config(threshold, ordering)).unwrap();
        for record in result.report.records() {
            prop_assert!(ordering.within_threshold(record.pair.persistence(), threshold));
        }
    }

    /// Property: exact ordering leaves both pair sequences sorted.
    #[test]
    fn prop_exact_pairs_are_sorted(
        (rows, cols) in grid_dims(),
        seed in any::<u64>(),
    ) {
        let mut complex = generate_random_grid_complex(rows, cols, seed).unwrap();
        let result = simplify(&mut complex, &config(0.1, PairOrdering::Exact)).unwrap();
        prop_assert!(result.pairs.is_sorted(PairOrdering::Exact));
    }

    /// Property: two runs over the same grid agree exactly.
    #[test]
    fn prop_simplification_is_deterministic(
        (rows, cols) in grid_dims(),
        seed in any::<u64>(),
        threshold in 0.0f64..1.0,
    ) {
        let cfg = SimplificationConfig::new(threshold);
        let mut first = generate_random_grid_complex(rows, cols, seed).unwrap();
        let mut second = generate_random_grid_complex(rows, cols, seed).unwrap();
        let a = simplify(&mut first, &cfg).unwrap();
        let b = simplify(&mut second, &cfg).unwrap();

        prop_assert_eq!(&a.report, &b.report);
        prop_assert_eq!(first.critical_simplices(), second.critical_simplices());
    }
}
