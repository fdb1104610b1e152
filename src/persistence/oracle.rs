//! Boundary-matrix reduction over Z/2.
//!
//! A [`PersistenceOracle`] turns the [`BoundaryMatrix`] of a filtration into
//! an [`IndexPairing`]: birth/death index pairs plus the essential (unpaired)
//! indices. Two reducers are provided:
//!
//! - [`TwistReduction`] reduces dimensions from highest to lowest and clears
//!   every column whose index has become a pivot. This is the default.
//! - [`StandardReduction`] reduces every column left to right.
//!
//! Both produce the same pairing; the reduced matrix is unique in its pivots.
//!
//! # Examples
//!
//! ```rust
//! use discrete_morse::core::collections::BoundaryFaceBuffer;
//! use discrete_morse::persistence::oracle::{
//!     BoundaryMatrix, PersistenceOracle, StandardReduction, TwistReduction,
//! };
//! use smallvec::smallvec;
//!
//! // Two vertices joined by one edge.
//! let mut matrix = BoundaryMatrix::new();
//! matrix.push_column(0, BoundaryFaceBuffer::new());
//! matrix.push_column(0, BoundaryFaceBuffer::new());
//! matrix.push_column(1, smallvec![0, 1]);
//!
//! let pairing = TwistReduction.compute_pairing(&matrix).unwrap();
//! assert_eq!(pairing.pairs, vec![(1, 2)]);
//! assert_eq!(pairing.essential, vec![0]);
//! assert_eq!(StandardReduction.compute_pairing(&matrix).unwrap(), pairing);
//! ```

#![forbid(unsafe_code)]

use thiserror::Error;

use crate::core::collections::BoundaryFaceBuffer;

// =============================================================================
// BOUNDARY MATRIX
// =============================================================================

/// One column per filtration index: its dimension and ascending face indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryMatrix {
    dims: Vec<u8>,
    columns: Vec<BoundaryFaceBuffer>,
}

impl BoundaryMatrix {
    /// Creates an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty matrix with room for `columns` columns.
    #[must_use]
    pub fn with_capacity(columns: usize) -> Self {
        Self {
            dims: Vec::with_capacity(columns),
            columns: Vec::with_capacity(columns),
        }
    }

    /// Appends the column for the next filtration index.
    pub fn push_column(&mut self, dim: u8, faces: BoundaryFaceBuffer) {
        self.dims.push(dim);
        self.columns.push(faces);
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the matrix has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Dimension of the simplex at `index`.
    #[must_use]
    pub fn dim(&self, index: usize) -> Option<u8> {
        self.dims.get(index).copied()
    }

    /// Face indices of the column at `index`.
    #[must_use]
    pub fn faces(&self, index: usize) -> Option<&[usize]> {
        self.columns.get(index).map(|c| c.as_slice())
    }

    /// Highest dimension present, or `None` for an empty matrix.
    #[must_use]
    pub fn max_dim(&self) -> Option<u8> {
        self.dims.iter().copied().max()
    }

    /// Checks that every face precedes its column and has dimension one lower.
    ///
    /// # Errors
    ///
    /// Returns the first [`OracleError`] found.
    pub fn validate(&self) -> Result<(), OracleError> {
        for (column, (faces, &dim)) in self.columns.iter().zip(&self.dims).enumerate() {
            if faces.windows(2).any(|w| w[0] >= w[1]) {
                return Err(OracleError::UnsortedColumn { column });
            }
            for &face in faces {
                if face >= column {
                    return Err(OracleError::FaceAfterColumn { column, face });
                }
                if self.dims[face] + 1 != dim {
                    return Err(OracleError::FaceDimension {
                        column,
                        face,
                        column_dim: dim,
                        face_dim: self.dims[face],
                    });
                }
            }
        }
        Ok(())
    }
}

/// Errors raised for a malformed boundary matrix.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum OracleError {
    /// A column's face indices are not strictly ascending.
    #[error("Column {column} has unsorted or repeated face indices")]
    UnsortedColumn {
        /// The offending column.
        column: usize,
    },
    /// A face index is not smaller than its column index.
    #[error("Column {column} references face {face}, which does not precede it")]
    FaceAfterColumn {
        /// The offending column.
        column: usize,
        /// The face index.
        face: usize,
    },
    /// A face is not exactly one dimension lower than its column.
    #[error("Column {column} (dim {column_dim}) references face {face} of dim {face_dim}")]
    FaceDimension {
        /// The offending column.
        column: usize,
        /// The face index.
        face: usize,
        /// Column dimension.
        column_dim: u8,
        /// Face dimension.
        face_dim: u8,
    },
}

// =============================================================================
// PAIRING
// =============================================================================

/// The output of a reduction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexPairing {
    /// `(birth, death)` index pairs, ascending.
    pub pairs: Vec<(usize, usize)>,
    /// Indices in no pair, ascending.
    pub essential: Vec<usize>,
}

impl IndexPairing {
    fn from_pivots(pivot_of_column: &[Option<usize>]) -> Self {
        let mut paired = vec![false; pivot_of_column.len()];
        let mut pairs = Vec::new();
        for (death, low) in pivot_of_column.iter().enumerate() {
            if let Some(birth) = *low {
                pairs.push((birth, death));
                paired[birth] = true;
                paired[death] = true;
            }
        }
        pairs.sort_unstable();
        let essential = paired
            .iter()
            .enumerate()
            .filter_map(|(i, &p)| (!p).then_some(i))
            .collect();
        Self { pairs, essential }
    }
}

/// Computes the persistence pairing of a boundary matrix.
pub trait PersistenceOracle {
    /// Reduces `matrix` and returns its pairing.
    ///
    /// # Errors
    ///
    /// Returns an [`OracleError`] if the matrix is malformed.
    fn compute_pairing(&self, matrix: &BoundaryMatrix) -> Result<IndexPairing, OracleError>;
}

// =============================================================================
// REDUCTION
// =============================================================================

/// Z/2 column addition: `target ^= source`, both sorted ascending.
fn add_column(target: &mut Vec<usize>, source: &[usize]) {
    let mut merged = Vec::with_capacity(target.len() + source.len());
    let (mut i, mut j) = (0, 0);
    while i < target.len() && j < source.len() {
        match target[i].cmp(&source[j]) {
            std::cmp::Ordering::Less => {
                merged.push(target[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                merged.push(source[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    merged.extend_from_slice(&target[i..]);
    merged.extend_from_slice(&source[j..]);
    *target = merged;
}

struct Reducer {
    columns: Vec<Vec<usize>>,
    /// `owner[row]` is the column whose pivot is `row`.
    owner: Vec<Option<usize>>,
    /// `low[column]` is the pivot of a reduced non-zero column.
    low: Vec<Option<usize>>,
}

impl Reducer {
    fn new(matrix: &BoundaryMatrix) -> Self {
        let n = matrix.len();
        Self {
            columns: matrix.columns.iter().map(|c| c.to_vec()).collect(),
            owner: vec![None; n],
            low: vec![None; n],
        }
    }

    fn reduce_column(&mut self, j: usize) {
        let mut column = std::mem::take(&mut self.columns[j]);
        while let Some(&pivot) = column.last() {
            match self.owner[pivot] {
                Some(k) => add_column(&mut column, &self.columns[k]),
                None => {
                    self.owner[pivot] = Some(j);
                    self.low[j] = Some(pivot);
                    break;
                }
            }
        }
        self.columns[j] = column;
    }
}

/// Twist reduction: highest dimension first, with clearing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TwistReduction;

impl PersistenceOracle for TwistReduction {
    fn compute_pairing(&self, matrix: &BoundaryMatrix) -> Result<IndexPairing, OracleError> {
        matrix.validate()?;
        let mut reducer = Reducer::new(matrix);
        let Some(max_dim) = matrix.max_dim() else {
            return Ok(IndexPairing::default());
        };
        let mut cleared = 0usize;
        for dim in (1..=max_dim).rev() {
            for j in 0..matrix.len() {
                if matrix.dims[j] != dim || reducer.owner[j].is_some() {
                    continue;
                }
                reducer.reduce_column(j);
                if let Some(pivot) = reducer.low[j] {
                    // A pivot row is a birth; its own column must reduce to zero.
                    reducer.columns[pivot].clear();
                    cleared += 1;
                }
            }
        }
        let pairing = IndexPairing::from_pivots(&reducer.low);
        tracing::debug!(
            columns = matrix.len(),
            pairs = pairing.pairs.len(),
            cleared,
            "twist reduction finished"
        );
        Ok(pairing)
    }
}

/// Textbook left-to-right reduction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StandardReduction;

impl PersistenceOracle for StandardReduction {
    fn compute_pairing(&self, matrix: &BoundaryMatrix) -> Result<IndexPairing, OracleError> {
        matrix.validate()?;
        let mut reducer = Reducer::new(matrix);
        for j in 0..matrix.len() {
            reducer.reduce_column(j);
        }
        let pairing = IndexPairing::from_pivots(&reducer.low);
        tracing::debug!(
            columns = matrix.len(),
            pairs = pairing.pairs.len(),
            "standard reduction finished"
        );
        Ok(pairing)
    }
}
