//! Property-based tests for filtrations and persistence pairing.
//!
//! ## Test Properties
//!
//! 1. **Face before coface**: every face precedes its cofaces
//! 2. **Permutation**: positions are exactly `0..n`
//! 3. **Key order**: order keys never decrease along the filtration
//! 4. **Oracle agreement**: twist and standard reduction give the same pairing
//! 5. **Pair accounting**: every simplex is in exactly one pair or essential

#![forbid(unsafe_code)]

use std::cmp::Ordering;

use discrete_morse::prelude::*;
use proptest::prelude::*;

fn grid() -> impl Strategy<Value = SimplicialComplex> {
    (2usize..8, 2usize..8, any::<u64>())
        .prop_map(|(rows, cols, seed)| generate_random_grid_complex(rows, cols, seed).unwrap())
}

/// Grids whose values are drawn from a handful of levels, so ties are common.
fn plateau_grid() -> impl Strategy<Value = SimplicialComplex> {
    (2usize..6, 2usize..6).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(0u8..3, rows * cols).prop_map(move |levels| {
            let values: Vec<f64> = levels.into_iter().map(f64::from).collect();
            generate_grid_complex(rows, cols, &values).unwrap()
        })
    })
}

proptest! {
    /// Property: the filtration is valid and keys are non-decreasing.
    #[test]
    fn prop_filtration_is_valid(mut complex in grid()) {
        let filtration = Filtration::build(&mut complex);
        prop_assert_eq!(filtration.len(), complex.number_of_simplices());
        prop_assert!(filtration.validate(&complex).is_ok());

        for window in filtration.as_slice().windows(2) {
            let a = complex.order_key(window[0]).unwrap();
            let b = complex.order_key(window[1]).unwrap();
            prop_assert_ne!(a.cmp_total(&b), Ordering::Greater);
        }
    }

    /// Property: ties on plateaus still keep faces first.
    #[test]
    fn prop_plateau_filtration_is_valid(mut complex in plateau_grid()) {
        let filtration = Filtration::build(&mut complex);
        prop_assert!(filtration.validate(&complex).is_ok());
        let matrix = filtration.boundary_matrix(&complex).unwrap();
        prop_assert!(matrix.validate().is_ok());
    }

    /// Property: both reducers agree.
    #[test]
    fn prop_twist_matches_standard(mut complex in plateau_grid()) {
        let filtration = Filtration::build(&mut complex);
        let matrix = filtration.boundary_matrix(&complex).unwrap();
        let twist = TwistReduction.compute_pairing(&matrix).unwrap();
        let standard = StandardReduction.compute_pairing(&matrix).unwrap();
        prop_assert_eq!(twist, standard);
    }

    /// Property: pairs and essential simplices partition the filtration,
    /// and a grid keeps exactly one essential class (a vertex).
    #[test]
    fn prop_pairs_partition_simplices(mut complex in grid()) {
        let filtration = Filtration::build(&mut complex);
        let matrix = filtration.boundary_matrix(&complex).unwrap();
        let pairing = TwistReduction.compute_pairing(&matrix).unwrap();
        prop_assert_eq!(
            2 * pairing.pairs.len() + pairing.essential.len(),
            filtration.len()
        );

        let pairs = PersistencePairs::from_pairing(&complex, &filtration, &pairing).unwrap();
        prop_assert_eq!(pairs.essential().len(), 1);
        prop_assert_eq!(pairs.essential()[0].dim(), 0);
        for p in pairs.min_saddle() {
            prop_assert!(p.persistence >= 0.0);
        }
        for p in pairs.saddle_max() {
            prop_assert!(p.persistence >= 0.0);
        }
    }
}
