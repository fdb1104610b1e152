//! Typed persistence pairs.
//!
//! [`PersistencePairs::from_pairing`] translates the index pairs of an
//! [`IndexPairing`] back into vertex–edge ([`MinSaddlePair`], kind `01`) and
//! edge–triangle ([`SaddleMaxPair`], kind `12`) pairs, computing each pair's
//! persistence and tie-break keys from the complex.

#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::fmt;
use std::io::{self, Write};

use thiserror::Error;

use super::oracle::IndexPairing;
use super::ordering::{PairOrdering, stable_merge_sort_by};
use crate::core::complex::SimplicialComplex;
use crate::core::filtration::Filtration;
use crate::core::simplex::{EdgeKey, Simplex, TriangleKey, VertexKey};

// =============================================================================
// PAIR TYPES
// =============================================================================

/// Which dimensions a pair connects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PairKind {
    /// Vertex–edge.
    MinSaddle,
    /// Edge–triangle.
    SaddleMax,
}

impl fmt::Display for PairKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MinSaddle => "01",
            Self::SaddleMax => "12",
        })
    }
}

/// A vertex–edge persistence pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinSaddlePair {
    /// The birth vertex.
    pub min: VertexKey,
    /// The death edge.
    pub saddle: EdgeKey,
    /// `saddle.value − min.value`.
    pub persistence: f64,
    /// The edge's perturbation key.
    pub sym_perturb: f64,
    /// `position(saddle) − position(min)`.
    pub loc_diff: usize,
}

impl MinSaddlePair {
    /// Compares by persistence, then key, then `loc_diff` (exact).
    #[must_use]
    pub fn compare(&self, other: &Self, ordering: PairOrdering) -> Ordering {
        ordering
            .compare_keys(
                &[self.persistence, self.sym_perturb],
                &[other.persistence, other.sym_perturb],
            )
            .then_with(|| self.loc_diff.cmp(&other.loc_diff))
    }
}

/// An edge–triangle persistence pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaddleMaxPair {
    /// The birth edge.
    pub saddle: EdgeKey,
    /// The death triangle.
    pub max: TriangleKey,
    /// `max.value − saddle.value`.
    pub persistence: f64,
    /// Triangle primary key minus edge key.
    pub sym_perturb1: f64,
    /// Triangle secondary key.
    pub sym_perturb2: f64,
    /// `position(max) − position(saddle)`.
    pub loc_diff: usize,
}

impl SaddleMaxPair {
    /// Compares by persistence, both keys, then `loc_diff` (exact).
    #[must_use]
    pub fn compare(&self, other: &Self, ordering: PairOrdering) -> Ordering {
        ordering
            .compare_keys(
                &[self.persistence, self.sym_perturb1, self.sym_perturb2],
                &[other.persistence, other.sym_perturb1, other.sym_perturb2],
            )
            .then_with(|| self.loc_diff.cmp(&other.loc_diff))
    }
}

/// Either kind of pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PersistencePair {
    /// Vertex–edge.
    MinSaddle(MinSaddlePair),
    /// Edge–triangle.
    SaddleMax(SaddleMaxPair),
}

impl PersistencePair {
    /// The pair's kind.
    #[must_use]
    pub const fn kind(&self) -> PairKind {
        match self {
            Self::MinSaddle(_) => PairKind::MinSaddle,
            Self::SaddleMax(_) => PairKind::SaddleMax,
        }
    }

    /// The pair's persistence.
    #[must_use]
    pub const fn persistence(&self) -> f64 {
        match self {
            Self::MinSaddle(p) => p.persistence,
            Self::SaddleMax(p) => p.persistence,
        }
    }

    /// The lower-dimensional endpoint.
    #[must_use]
    pub const fn lower(&self) -> Simplex {
        match self {
            Self::MinSaddle(p) => Simplex::Vertex(p.min),
            Self::SaddleMax(p) => Simplex::Edge(p.saddle),
        }
    }

    /// The higher-dimensional endpoint.
    #[must_use]
    pub const fn higher(&self) -> Simplex {
        match self {
            Self::MinSaddle(p) => Simplex::Edge(p.saddle),
            Self::SaddleMax(p) => Simplex::Triangle(p.max),
        }
    }
}

impl From<MinSaddlePair> for PersistencePair {
    fn from(pair: MinSaddlePair) -> Self {
        Self::MinSaddle(pair)
    }
}

impl From<SaddleMaxPair> for PersistencePair {
    fn from(pair: SaddleMaxPair) -> Self {
        Self::SaddleMax(pair)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised while translating an index pairing into typed pairs.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PairingError {
    /// An index is past the end of the filtration.
    #[error("Index {index} out of range for a filtration of {len} simplices")]
    IndexOutOfRange {
        /// The index.
        index: usize,
        /// Filtration length.
        len: usize,
    },
    /// The death simplex is not one dimension above the birth simplex.
    #[error("Pair ({birth}, {death}) joins dimensions {birth_dim} and {death_dim}")]
    DimensionMismatch {
        /// Birth index.
        birth: usize,
        /// Death index.
        death: usize,
        /// Birth dimension.
        birth_dim: u8,
        /// Death dimension.
        death_dim: u8,
    },
    /// The birth index does not precede the death index.
    #[error("Pair ({birth}, {death}) is born after it dies")]
    BirthAfterDeath {
        /// Birth index.
        birth: usize,
        /// Death index.
        death: usize,
    },
    /// A filtration entry is missing from the complex.
    #[error("Simplex {simplex} is not in the complex")]
    UnknownSimplex {
        /// The simplex.
        simplex: Simplex,
    },
}

// =============================================================================
// PAIR COLLECTION
// =============================================================================

/// The vertex–edge and edge–triangle pairs of a filtration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersistencePairs {
    min_saddle: Vec<MinSaddlePair>,
    saddle_max: Vec<SaddleMaxPair>,
    essential: Vec<Simplex>,
}

impl PersistencePairs {
    /// Builds typed pairs from an index pairing, keeping the pairing's order.
    ///
    /// # Errors
    ///
    /// Returns a [`PairingError`] if an index pair is out of range, runs
    /// backwards, does not join adjacent dimensions, or names a triangle as
    /// its birth.
    pub fn from_pairing(
        complex: &SimplicialComplex,
        filtration: &Filtration,
        pairing: &IndexPairing,
    ) -> Result<Self, PairingError> {
        let lookup = |index: usize| {
            filtration.get(index).ok_or(PairingError::IndexOutOfRange {
                index,
                len: filtration.len(),
            })
        };
        let value = |simplex: Simplex| {
            complex
                .value(simplex)
                .ok_or(PairingError::UnknownSimplex { simplex })
        };
        let perturbation = |simplex: Simplex| {
            complex
                .perturbation(simplex)
                .ok_or(PairingError::UnknownSimplex { simplex })
        };

        let mut pairs = Self::default();
        for &(birth, death) in &pairing.pairs {
            if birth >= death {
                return Err(PairingError::BirthAfterDeath { birth, death });
            }
            let loc_diff = death - birth;
            match (lookup(birth)?, lookup(death)?) {
                (Simplex::Vertex(v), Simplex::Edge(e)) => {
                    let (lower, higher) = (Simplex::Vertex(v), Simplex::Edge(e));
                    pairs.min_saddle.push(MinSaddlePair {
                        min: v,
                        saddle: e,
                        persistence: value(higher)? - value(lower)?,
                        sym_perturb: perturbation(higher)?.primary(),
                        loc_diff,
                    });
                }
                (Simplex::Edge(e), Simplex::Triangle(t)) => {
                    let (lower, higher) = (Simplex::Edge(e), Simplex::Triangle(t));
                    let edge_key = perturbation(lower)?.primary();
                    let triangle_keys = perturbation(higher)?;
                    pairs.saddle_max.push(SaddleMaxPair {
                        saddle: e,
                        max: t,
                        persistence: value(higher)? - value(lower)?,
                        sym_perturb1: triangle_keys.primary() - edge_key,
                        sym_perturb2: triangle_keys.secondary().unwrap_or_default(),
                        loc_diff,
                    });
                }
                (b, d) => {
                    return Err(PairingError::DimensionMismatch {
                        birth,
                        death,
                        birth_dim: b.dim(),
                        death_dim: d.dim(),
                    });
                }
            }
        }
        for &index in &pairing.essential {
            pairs.essential.push(lookup(index)?);
        }
        Ok(pairs)
    }

    /// Vertex–edge pairs.
    #[must_use]
    pub fn min_saddle(&self) -> &[MinSaddlePair] {
        &self.min_saddle
    }

    /// Edge–triangle pairs.
    #[must_use]
    pub fn saddle_max(&self) -> &[SaddleMaxPair] {
        &self.saddle_max
    }

    /// Simplices left unpaired by the oracle, in filtration order.
    #[must_use]
    pub fn essential(&self) -> &[Simplex] {
        &self.essential
    }

    /// Total number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.min_saddle.len() + self.saddle_max.len()
    }

    /// Returns `true` if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorts both sequences ascending under `ordering`.
    pub fn sort(&mut self, ordering: PairOrdering) {
        stable_merge_sort_by(&mut self.min_saddle, |a, b| a.compare(b, ordering));
        stable_merge_sort_by(&mut self.saddle_max, |a, b| a.compare(b, ordering));
    }

    /// Returns `true` if no element of either sequence is greater than its successor.
    #[must_use]
    pub fn is_sorted(&self, ordering: PairOrdering) -> bool {
        self.min_saddle
            .windows(2)
            .all(|w| w[0].compare(&w[1], ordering) != Ordering::Greater)
            && self
                .saddle_max
                .windows(2)
                .all(|w| w[0].compare(&w[1], ordering) != Ordering::Greater)
    }

    /// Writes one line per pair, vertex–edge pairs first:
    /// `Vertex Edge <persistence> <key>` and
    /// `Edge Triangle <persistence> <key1> <key2>`.
    ///
    /// # Errors
    ///
    /// Propagates any I/O error from `out`.
    pub fn write_pairs<W: Write>(&self, mut out: W) -> io::Result<()> {
        for p in &self.min_saddle {
            writeln!(out, "Vertex Edge {} {}", p.persistence, p.sym_perturb)?;
        }
        for p in &self.saddle_max {
            writeln!(
                out,
                "Edge Triangle {} {} {}",
                p.persistence, p.sym_perturb1, p.sym_perturb2
            )?;
        }
        Ok(())
    }
}
