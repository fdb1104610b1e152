//! Critical-point counts and the weak Morse equality.
//!
//! For a discrete gradient field on a complex K, the alternating sum of
//! critical simplices equals the Euler characteristic:
//!
//! ```text
//! c₀ − c₁ + c₂ = V − E + T = χ(K)
//! ```
//!
//! Cancelling a pair removes one k-simplex and one (k+1)-simplex from the
//! critical set, so the equality holds before and after simplification.
//!
//! # Examples
//!
//! ```rust
//! use discrete_morse::core::builder::ComplexBuilder;
//! use discrete_morse::topology::morse::{CriticalCounts, validate_morse_counts};
//!
//! // A single triangle is a disk: χ = 3 − 3 + 1 = 1.
//! let complex = ComplexBuilder::new(&[0.0, 1.0, 2.0])
//!     .triangle([0, 1, 2])
//!     .build()
//!     .unwrap();
//!
//! let counts = CriticalCounts::from_complex(&complex);
//! assert_eq!((counts.minima, counts.saddles, counts.maxima), (3, 3, 1));
//! assert_eq!(counts.alternating_sum(), 1);
//! assert!(validate_morse_counts(&complex).is_ok());
//! ```

#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::complex::SimplicialComplex;
use crate::core::simplex::Simplex;

/// Errors raised by [`validate_morse_counts`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MorseError {
    /// The critical counts do not add up to χ(K).
    #[error(
        "Critical counts {counts} give alternating sum {alternating_sum}, expected Euler characteristic {euler}"
    )]
    EulerMismatch {
        /// The offending counts.
        counts: CriticalCounts,
        /// c₀ − c₁ + c₂.
        alternating_sum: i64,
        /// V − E + T.
        euler: i64,
    },
}

/// Number of critical simplices per dimension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CriticalCounts {
    /// Critical vertices.
    pub minima: usize,
    /// Critical edges.
    pub saddles: usize,
    /// Critical triangles.
    pub maxima: usize,
}

impl CriticalCounts {
    /// Counts the current critical set of `complex`.
    #[must_use]
    pub fn from_complex(complex: &SimplicialComplex) -> Self {
        let mut counts = Self::default();
        for simplex in complex.critical_simplices() {
            match simplex {
                Simplex::Vertex(_) => counts.minima += 1,
                Simplex::Edge(_) => counts.saddles += 1,
                Simplex::Triangle(_) => counts.maxima += 1,
            }
        }
        counts
    }

    /// Total number of critical simplices.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.minima + self.saddles + self.maxima
    }

    /// c₀ − c₁ + c₂.
    #[must_use]
    pub fn alternating_sum(&self) -> i64 {
        signed(self.minima) - signed(self.saddles) + signed(self.maxima)
    }
}

impl fmt::Display for CriticalCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.minima, self.saddles, self.maxima)
    }
}

fn signed(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Checks that the critical set of `complex` satisfies c₀ − c₁ + c₂ = χ(K).
///
/// # Errors
///
/// Returns [`MorseError::EulerMismatch`] when the sums differ, which means the
/// critical set was edited outside of a cancellation.
pub fn validate_morse_counts(complex: &SimplicialComplex) -> Result<CriticalCounts, MorseError> {
    let counts = CriticalCounts::from_complex(complex);
    let alternating_sum = counts.alternating_sum();
    let euler = complex.euler_characteristic();
    if alternating_sum == euler {
        Ok(counts)
    } else {
        Err(MorseError::EulerMismatch {
            counts,
            alternating_sum,
            euler,
        })
    }
}
