//! # discrete-morse
//!
//! Persistence-guided simplification of discrete gradient vector fields on
//! 2-dimensional [simplicial complexes](https://en.wikipedia.org/wiki/Simplicial_complex).
//!
//! A discrete gradient field pairs simplices of adjacent dimension; the
//! unpaired ones are critical. This crate orders the complex into a
//! filtration, asks a persistence oracle for the birth/death pairing, and then
//! cancels every critical pair whose persistence stays below a threshold by
//! reversing the unique V-path that connects it.
//!
//! # Features
//!
//! - Vertex/edge/triangle complexes with typed slotmap keys and validated incidence
//! - Lower-star value assignment and seeded grid generators
//! - Z/2 boundary-matrix reduction (twist and standard) behind the
//!   [`PersistenceOracle`](persistence::oracle::PersistenceOracle) trait
//! - Epsilon-tolerant or exact pair ordering with a stable, panic-free sort
//! - Serializable configuration built with [`derive_builder`]
//!
//! # Basic Usage
//!
//! ```rust
//! use discrete_morse::prelude::*;
//!
//! // A 4×4 grid of values with two local minima on a ring at height 1.
//! let values = [
//!     0.0, 1.0, 1.0, 1.0,
//!     1.0, 5.0, 5.0, 1.0,
//!     1.0, 5.0, 5.0, 1.0,
//!     1.0, 1.0, 1.0, 0.5,
//! ];
//! let mut complex = generate_grid_complex(4, 4, &values).unwrap();
//!
//! let config = SimplificationConfig::new(1.0);
//! let result = simplify(&mut complex, &config).unwrap();
//!
//! // The shallow minimum at 0.5 merges into the global one.
//! let counts = CriticalCounts::from_complex(&complex);
//! assert_eq!(counts.minima, 1);
//! assert_eq!(counts.alternating_sum(), complex.euler_characteristic());
//! assert!(result.report.cancelled() > 0);
//! ```
//!
//! # Simplification Invariants
//!
//! | Invariant | Checked by | Notes |
//! |---|---|---|
//! | Face before coface | [`Filtration::validate`](core::filtration::Filtration::validate) | Every face precedes its cofaces in the filtration. |
//! | Matching | [`GradientField`](core::gradient::GradientField) | Every simplex is in at most one pair; mutations that would break this are errors. |
//! | Incidence | [`SimplicialComplex::validate`](core::complex::SimplicialComplex::validate) | Boundary and coboundary maps agree. |
//! | Weak Morse equality | [`validate_morse_counts`](topology::morse::validate_morse_counts) | c₀ − c₁ + c₂ = χ(K) before and after simplification. |
//!
//! Cancellation outcomes such as "no path found" are ordinary values
//! ([`Cancellability`](simplification::vpath::Cancellability)); only contract
//! violations are reported as errors.

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

/// The `core` module contains the complex, its filtration and the gradient field.
///
/// It includes the [`SimplicialComplex`](core::complex::SimplicialComplex) with
/// its vertex, edge and triangle records, the lower-star
/// [`ComplexBuilder`](core::builder::ComplexBuilder), and the
/// [`GradientField`](core::gradient::GradientField) matching.
pub mod core {
    pub mod builder;
    /// Collection aliases used throughout the crate
    pub mod collections;
    pub mod complex;
    pub mod edge;
    /// Filtration order and boundary-matrix export
    pub mod filtration;
    pub mod gradient;
    pub mod simplex;
    pub mod triangle;
    pub mod vertex;
    // Re-export the `core` modules.
    pub use builder::*;
    pub use complex::*;
    pub use edge::*;
    pub use filtration::*;
    pub use gradient::*;
    pub use simplex::*;
    pub use triangle::*;
    pub use vertex::*;
    // Note: collections module not re-exported here to avoid namespace pollution
    // Import specific types via prelude or use crate::core::collections::
}

/// Persistence pairing: the oracle contract, reducers and typed pairs.
pub mod persistence {
    /// Boundary-matrix reduction over Z/2
    pub mod oracle;
    pub mod ordering;
    pub mod pairs;
    pub use oracle::*;
    pub use ordering::*;
    pub use pairs::*;
}

/// Cancellation of persistence pairs on a gradient field.
///
/// The [`pipeline`](simplification::pipeline) module runs every stage end to
/// end; the other modules expose each stage on its own.
pub mod simplification {
    pub mod cancellation;
    pub mod config;
    pub mod pipeline;
    pub mod reversal;
    /// V-path search and cancellability
    pub mod vpath;
    pub use cancellation::*;
    pub use config::*;
    pub use pipeline::*;
    pub use reversal::*;
    pub use vpath::*;
}

/// Topological checks on a simplified complex.
pub mod topology {
    pub mod morse;
    pub use morse::*;
}

/// A prelude module that re-exports commonly used types and functions.
/// This makes it easier to import the most commonly used items from the crate.
pub mod prelude {
    // Re-export from core
    pub use crate::core::{
        builder::*, complex::*, edge::*, filtration::*, gradient::*, simplex::*, triangle::*,
        vertex::*,
    };

    // Re-export commonly used collection types from core::collections
    pub use crate::core::collections::{
        FastHashMap, FastHashSet, SimplexMap, SimplexSet, SmallBuffer, StorageMap,
        fast_hash_map_with_capacity, fast_hash_set_with_capacity,
    };

    // Re-export persistence and simplification stages
    pub use crate::persistence::{oracle::*, ordering::*, pairs::*};
    pub use crate::simplification::{
        cancellation::*, config::*, pipeline::*, reversal::*, vpath::*,
    };

    pub use crate::topology::morse::*;
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{
        core::{complex::SimplicialComplex, filtration::Filtration, gradient::GradientField},
        is_normal,
        persistence::pairs::PersistencePairs,
        simplification::{cancellation::CancellationReport, pipeline::Simplification},
    };

    // =============================================================================
    // TYPE SAFETY TESTS
    // =============================================================================

    #[test]
    fn normal_types() {
        assert!(is_normal::<SimplicialComplex>());
        assert!(is_normal::<GradientField>());
        assert!(is_normal::<Filtration>());
        assert!(is_normal::<PersistencePairs>());
        assert!(is_normal::<CancellationReport>());
        assert!(is_normal::<Simplification>());
    }

    #[test]
    fn test_prelude_collections_exports() {
        use crate::prelude::*;

        let mut map: FastHashMap<u64, usize> = FastHashMap::default();
        map.insert(123, 456);
        assert_eq!(map.get(&123), Some(&456));

        let mut set: FastHashSet<u64> = FastHashSet::default();
        set.insert(789);
        assert!(set.contains(&789));

        let mut buffer: SmallBuffer<i32, 8> = SmallBuffer::new();
        buffer.push(42);
        assert_eq!(buffer.len(), 1);

        let map_with_cap = fast_hash_map_with_capacity::<u64, usize>(100);
        assert!(map_with_cap.capacity() >= 100);

        let set_with_cap = fast_hash_set_with_capacity::<u64>(50);
        assert!(set_with_cap.capacity() >= 50);

        let _critical: SimplexSet = SimplexSet::default();
    }

    #[test]
    fn test_prelude_pipeline_exports() {
        use crate::prelude::*;

        let mut complex = generate_random_grid_complex(4, 4, 11).unwrap();
        let result = simplify_with_oracle(
            &mut complex,
            &SimplificationConfig::new(0.5),
            &StandardReduction,
        )
        .unwrap();
        assert!(result.filtration.validate(&complex).is_ok());
        assert!(validate_morse_counts(&complex).is_ok());
    }
}
