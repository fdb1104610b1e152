//! Filtration: a total order over all simplices consistent with the function.
//!
//! [`Filtration::build`] concatenates vertices, edges and triangles, sorts them
//! by [`OrderKey`], and writes each simplex's index back into the complex as its
//! filtration position. [`Filtration::boundary_matrix`] exports the order as
//! input for a persistence oracle.
//!
//! # Examples
//!
//! ```rust
//! use discrete_morse::core::builder::ComplexBuilder;
//! use discrete_morse::core::filtration::Filtration;
//!
//! let mut complex = ComplexBuilder::new(&[0.0, 2.0, 1.0])
//!     .triangle([0, 1, 2])
//!     .build()
//!     .unwrap();
//! let filtration = Filtration::build(&mut complex);
//!
//! assert_eq!(filtration.len(), 7);
//! assert!(filtration.validate(&complex).is_ok());
//! for (index, &simplex) in filtration.iter().enumerate() {
//!     assert_eq!(complex.position(simplex), Some(index));
//! }
//! ```

#![forbid(unsafe_code)]

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collections::BoundaryFaceBuffer;
use super::complex::SimplicialComplex;
use super::simplex::{Perturbation, Simplex};
use crate::persistence::oracle::BoundaryMatrix;

// =============================================================================
// ORDER KEY
// =============================================================================

/// The key a simplex is sorted by: function value, then perturbation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderKey {
    /// Function value.
    pub value: f64,
    /// Symbolic perturbation key(s).
    pub perturbation: Perturbation,
}

impl OrderKey {
    /// Compares value with [`f64::total_cmp`], then perturbations lexicographically.
    #[must_use]
    pub fn cmp_total(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then_with(|| self.perturbation.cmp_lexicographic(&other.perturbation))
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised when a filtration no longer matches its complex.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FiltrationError {
    /// A face sorts after one of its cofaces.
    #[error("Face {face} at position {face_position} follows coface {coface} at position {coface_position}")]
    FaceAfterCoface {
        /// The face.
        face: Simplex,
        /// Its filtration position.
        face_position: usize,
        /// The coface.
        coface: Simplex,
        /// Its filtration position.
        coface_position: usize,
    },
    /// A simplex has no position, or a position different from its index.
    #[error("Simplex {simplex} has no filtration position matching index {index}")]
    MissingPosition {
        /// The simplex.
        simplex: Simplex,
        /// Its index in the filtration.
        index: usize,
    },
    /// The filtration does not cover the complex.
    #[error("Filtration holds {filtration} simplices but the complex has {complex}")]
    SizeMismatch {
        /// Filtration length.
        filtration: usize,
        /// Complex size.
        complex: usize,
    },
}

// =============================================================================
// FILTRATION
// =============================================================================

/// All simplices of a complex in filtration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filtration {
    order: Vec<Simplex>,
}

impl Filtration {
    /// Sorts the simplices of `complex` and records their positions.
    ///
    /// The sort is stable over vertices, then edges, then triangles (each in
    /// insertion order), so exact key ties keep lower dimensions first.
    pub fn build(complex: &mut SimplicialComplex) -> Self {
        let mut keyed: Vec<(Simplex, OrderKey)> = complex
            .simplices()
            .filter_map(|s| complex.order_key(s).map(|key| (s, key)))
            .collect();
        keyed.sort_by(|(_, a), (_, b)| a.cmp_total(b));

        let order: Vec<Simplex> = keyed.into_iter().map(|(s, _)| s).collect();
        for (position, &simplex) in order.iter().enumerate() {
            complex.set_position(simplex, position);
        }
        tracing::debug!(simplices = order.len(), "built filtration");
        Self { order }
    }

    /// Number of simplices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the filtration is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The simplex at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Simplex> {
        self.order.get(index).copied()
    }

    /// The simplices in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Simplex] {
        &self.order
    }

    /// Iterates in filtration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Simplex> {
        self.order.iter()
    }

    /// Checks positions against indices and face-before-coface.
    ///
    /// # Errors
    ///
    /// Returns the first [`FiltrationError`] found.
    pub fn validate(&self, complex: &SimplicialComplex) -> Result<(), FiltrationError> {
        if self.order.len() != complex.number_of_simplices() {
            return Err(FiltrationError::SizeMismatch {
                filtration: self.order.len(),
                complex: complex.number_of_simplices(),
            });
        }
        for (index, &simplex) in self.order.iter().enumerate() {
            if complex.position(simplex) != Some(index) {
                return Err(FiltrationError::MissingPosition { simplex, index });
            }
        }
        for (coface_position, &coface) in self.order.iter().enumerate() {
            for face in complex.faces(coface) {
                let face_position = complex
                    .position(face)
                    .ok_or(FiltrationError::MissingPosition {
                        simplex: face,
                        index: coface_position,
                    })?;
                if face_position >= coface_position {
                    return Err(FiltrationError::FaceAfterCoface {
                        face,
                        face_position,
                        coface,
                        coface_position,
                    });
                }
            }
        }
        Ok(())
    }

    /// Exports the boundary matrix: per index, the dimension and the ascending
    /// filtration indices of the codimension-one faces.
    ///
    /// # Errors
    ///
    /// Returns [`FiltrationError::MissingPosition`] if a face has no position.
    pub fn boundary_matrix(&self, complex: &SimplicialComplex) -> Result<BoundaryMatrix, FiltrationError> {
        let mut matrix = BoundaryMatrix::with_capacity(self.order.len());
        for (index, &simplex) in self.order.iter().enumerate() {
            let mut faces = BoundaryFaceBuffer::new();
            for face in complex.faces(simplex) {
                let position = complex
                    .position(face)
                    .ok_or(FiltrationError::MissingPosition { simplex: face, index })?;
                faces.push(position);
            }
            faces.sort_unstable();
            matrix.push_column(simplex.dim(), faces);
        }
        Ok(matrix)
    }
}

impl<'a> IntoIterator for &'a Filtration {
    type Item = &'a Simplex;
    type IntoIter = std::slice::Iter<'a, Simplex>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::{ComplexBuilder, generate_random_grid_complex};

    #[test]
    fn test_order_key_ties_break_on_perturbation() {
        let edge = OrderKey {
            value: 1.0,
            perturbation: Perturbation::Single(0.5),
        };
        let triangle = OrderKey {
            value: 1.0,
            perturbation: Perturbation::Pair(0.5, 0.0),
        };
        let lower = OrderKey {
            value: 0.5,
            perturbation: Perturbation::Pair(9.0, 9.0),
        };
        assert_eq!(edge.cmp_total(&triangle), Ordering::Less);
        assert_eq!(lower.cmp_total(&edge), Ordering::Less);
    }

    #[test]
    fn test_equal_values_keep_dimension_order() {
        let mut complex = ComplexBuilder::new(&[1.0, 1.0, 1.0])
            .triangle([0, 1, 2])
            .build()
            .unwrap();
        let filtration = Filtration::build(&mut complex);
        let dims: Vec<u8> = filtration.iter().map(|s| s.dim()).collect();
        assert_eq!(dims, vec![0, 0, 0, 1, 1, 1, 2]);
        assert!(filtration.validate(&complex).is_ok());
    }

    #[test]
    fn test_boundary_matrix_columns() {
        let mut complex = ComplexBuilder::new(&[0.0, 1.0, 2.0])
            .triangle([0, 1, 2])
            .build()
            .unwrap();
        let filtration = Filtration::build(&mut complex);
        let matrix = filtration.boundary_matrix(&complex).unwrap();

        // 0:v0 1:v1 2:e01 3:v2 4:e02 5:e12 6:t
        assert_eq!(matrix.len(), 7);
        assert_eq!(matrix.dim(2), Some(1));
        assert_eq!(matrix.faces(2), Some(&[0, 1][..]));
        assert_eq!(matrix.faces(3), Some(&[][..]));
        assert_eq!(matrix.faces(6), Some(&[2, 4, 5][..]));
    }

    #[test]
    fn test_validate_detects_size_mismatch() {
        let mut complex = generate_random_grid_complex(3, 3, 5).unwrap();
        let filtration = Filtration::build(&mut complex);
        let other = generate_random_grid_complex(4, 3, 5).unwrap();
        assert!(matches!(
            filtration.validate(&other),
            Err(FiltrationError::SizeMismatch { .. })
        ));
    }
}
