//! V-path search: can a persistence pair be cancelled?
//!
//! A pair is cancellable when exactly one gradient path (V-path) connects its
//! higher-dimensional endpoint to its lower-dimensional one in the current
//! [`GradientField`]. [`CancellabilityAnalyzer`] answers that question for
//! both pair kinds and returns the path to reverse.
//!
//! - Vertex–edge pairs: an edge has one downward path per endpoint, and each
//!   continues deterministically (vertex → paired edge → other endpoint) until
//!   it reaches an unpaired vertex. The pair is cancellable when exactly one of
//!   the two paths ends at the pair's vertex.
//! - Edge–triangle pairs: a breadth-first search from the triangle through
//!   its edges and their paired triangles. Any simplex reached along two
//!   different routes is marked as reached twice; the pair is cancellable when
//!   the saddle edge and every simplex on its predecessor chain were reached
//!   once.
//!
//! Both kinds take a shortcut when the endpoints have the same value and are
//! incident: the path is just the two endpoints.

#![forbid(unsafe_code)]

use std::collections::VecDeque;
use std::fmt;

use crate::core::collections::{Entry, FastHashMap, FastHashSet, PredecessorMap, SimplexMap};
use crate::core::complex::SimplicialComplex;
use crate::core::gradient::GradientField;
use crate::core::simplex::{Simplex, VertexKey};
use crate::persistence::ordering::PairOrdering;
use crate::persistence::pairs::{MinSaddlePair, PersistencePair, SaddleMaxPair};

// =============================================================================
// OUTCOME TYPES
// =============================================================================

/// An alternating sequence of simplices, starting at the pair's
/// higher-dimensional endpoint and ending at its lower-dimensional one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VPath {
    simplices: Vec<Simplex>,
}

impl VPath {
    /// Wraps a sequence of simplices.
    #[must_use]
    pub const fn new(simplices: Vec<Simplex>) -> Self {
        Self { simplices }
    }

    /// The simplices in path order.
    #[must_use]
    pub fn as_slice(&self) -> &[Simplex] {
        &self.simplices
    }

    /// Number of simplices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.simplices.len()
    }

    /// Returns `true` for an empty path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }

    /// First simplex (the higher-dimensional endpoint).
    #[must_use]
    pub fn first(&self) -> Option<Simplex> {
        self.simplices.first().copied()
    }

    /// Last simplex (the lower-dimensional endpoint).
    #[must_use]
    pub fn last(&self) -> Option<Simplex> {
        self.simplices.last().copied()
    }
}

/// Why a pair cannot be cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Obstruction {
    /// No V-path joins the endpoints.
    NoPath,
    /// More than one V-path joins the endpoints.
    PathNotUnique,
}

impl fmt::Display for Obstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoPath => "no path found",
            Self::PathNotUnique => "path not unique",
        })
    }
}

/// Result of a cancellability test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cancellability {
    /// Endpoints share a value and are incident; the path is the two endpoints.
    Trivial(VPath),
    /// Exactly one V-path joins the endpoints.
    Unique(VPath),
    /// The pair must be skipped.
    NotCancellable(Obstruction),
}

impl Cancellability {
    /// The path to reverse, if cancellable.
    #[must_use]
    pub const fn path(&self) -> Option<&VPath> {
        match self {
            Self::Trivial(path) | Self::Unique(path) => Some(path),
            Self::NotCancellable(_) => None,
        }
    }

    /// Returns `true` unless the pair is obstructed.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        !matches!(self, Self::NotCancellable(_))
    }
}

impl fmt::Display for Cancellability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trivial(_) => f.write_str("Yes (trivial)"),
            Self::Unique(_) => f.write_str("Yes"),
            Self::NotCancellable(reason) => write!(f, "No, Reason: {reason}"),
        }
    }
}

// =============================================================================
// ANALYZER
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Visit {
    Once,
    Twice,
}

/// Tests pairs against a snapshot of the gradient field.
#[derive(Clone, Copy, Debug)]
pub struct CancellabilityAnalyzer<'a> {
    complex: &'a SimplicialComplex,
    gradient: &'a GradientField,
    ordering: PairOrdering,
}

impl<'a> CancellabilityAnalyzer<'a> {
    /// Creates an analyzer over `complex` and `gradient`.
    #[must_use]
    pub const fn new(
        complex: &'a SimplicialComplex,
        gradient: &'a GradientField,
        ordering: PairOrdering,
    ) -> Self {
        Self {
            complex,
            gradient,
            ordering,
        }
    }

    /// Tests either kind of pair.
    #[must_use]
    pub fn analyze(&self, pair: &PersistencePair) -> Cancellability {
        match pair {
            PersistencePair::MinSaddle(p) => self.min_saddle(p),
            PersistencePair::SaddleMax(p) => self.saddle_max(p),
        }
    }

    fn shares_value(&self, lower: Simplex, higher: Simplex) -> bool {
        match (self.complex.value(lower), self.complex.value(higher)) {
            (Some(a), Some(b)) => self.ordering.same_value(b, a),
            _ => false,
        }
    }

    /// Tests a vertex–edge pair.
    #[must_use]
    pub fn min_saddle(&self, pair: &MinSaddlePair) -> Cancellability {
        let (vertex, edge) = (Simplex::Vertex(pair.min), Simplex::Edge(pair.saddle));

        let outcome = if self.shares_value(vertex, edge)
            && self.complex.edge_has_vertex(pair.saddle, pair.min)
        {
            Cancellability::Trivial(VPath::new(vec![edge, vertex]))
        } else if let Some(endpoints) = self.complex.edge_vertices(pair.saddle) {
            let mut reaching = endpoints
                .into_iter()
                .map(|start| self.descend(edge, start))
                .filter(|path| path.last() == Some(&vertex));
            match (reaching.next(), reaching.next()) {
                (Some(path), None) => Cancellability::Unique(VPath::new(path)),
                (Some(_), Some(_)) => Cancellability::NotCancellable(Obstruction::PathNotUnique),
                (None, _) => Cancellability::NotCancellable(Obstruction::NoPath),
            }
        } else {
            Cancellability::NotCancellable(Obstruction::NoPath)
        };

        tracing::debug!(
            kind = "01",
            persistence = pair.persistence,
            sym_perturb = pair.sym_perturb,
            outcome = %outcome,
            "cancellability test"
        );
        outcome
    }

    /// Follows the gradient down from `start`, an endpoint of `edge`, until an
    /// unpaired vertex. Returns `edge, start, e1, v1, …`.
    fn descend(&self, edge: Simplex, start: VertexKey) -> Vec<Simplex> {
        let mut path = vec![edge, Simplex::Vertex(start)];
        let mut seen: FastHashSet<VertexKey> = FastHashSet::default();
        let mut current = start;
        seen.insert(current);

        while let Some(next_edge) = self.gradient.edge_of_vertex(current) {
            let Some(exit) = self
                .complex
                .edge(next_edge)
                .and_then(|e| e.opposite(current))
            else {
                break;
            };
            path.push(Simplex::Edge(next_edge));
            path.push(Simplex::Vertex(exit));
            if !seen.insert(exit) {
                // Closed V-path: the field is not a gradient. Nothing below is reachable.
                break;
            }
            current = exit;
        }
        path
    }

    /// Tests an edge–triangle pair.
    #[must_use]
    pub fn saddle_max(&self, pair: &SaddleMaxPair) -> Cancellability {
        let (edge, triangle) = (Simplex::Edge(pair.saddle), Simplex::Triangle(pair.max));

        let outcome = if self.shares_value(edge, triangle)
            && self.complex.triangle_has_edge(pair.max, pair.saddle)
        {
            Cancellability::Trivial(VPath::new(vec![triangle, edge]))
        } else {
            self.search_from_triangle(triangle, edge)
        };

        tracing::debug!(
            kind = "12",
            persistence = pair.persistence,
            sym_perturb1 = pair.sym_perturb1,
            sym_perturb2 = pair.sym_perturb2,
            outcome = %outcome,
            "cancellability test"
        );
        outcome
    }

    fn search_from_triangle(&self, root: Simplex, target: Simplex) -> Cancellability {
        let mut visits: SimplexMap<Visit> = FastHashMap::default();
        let mut predecessor: PredecessorMap = FastHashMap::default();
        let mut queue: VecDeque<Simplex> = VecDeque::new();

        visits.insert(root, Visit::Once);
        queue.push_back(root);

        while let Some(current) = queue.pop_front() {
            match current {
                Simplex::Edge(e) => {
                    let Some(t) = self.gradient.triangle_of_edge(e) else {
                        continue;
                    };
                    let next = Simplex::Triangle(t);
                    match visits.entry(next) {
                        Entry::Vacant(slot) => {
                            slot.insert(Visit::Once);
                            predecessor.insert(next, current);
                            queue.push_back(next);
                        }
                        Entry::Occupied(mut slot) => {
                            slot.insert(Visit::Twice);
                        }
                    }
                }
                Simplex::Triangle(t) => {
                    let came_from = predecessor.get(&current).copied();
                    for e in self.complex.triangle_edges(t).into_iter().flatten() {
                        let next = Simplex::Edge(e);
                        match visits.entry(next) {
                            Entry::Vacant(slot) => {
                                slot.insert(Visit::Once);
                                predecessor.insert(next, current);
                                queue.push_back(next);
                            }
                            Entry::Occupied(mut slot) => {
                                if came_from != Some(next) {
                                    slot.insert(Visit::Twice);
                                }
                            }
                        }
                    }
                }
                Simplex::Vertex(_) => {}
            }
        }

        match visits.get(&target) {
            None => Cancellability::NotCancellable(Obstruction::NoPath),
            Some(Visit::Twice) => Cancellability::NotCancellable(Obstruction::PathNotUnique),
            Some(Visit::Once) => {
                let mut path = vec![target];
                let mut current = target;
                while let Some(&prev) = predecessor.get(&current) {
                    if visits.get(&prev) == Some(&Visit::Twice) {
                        return Cancellability::NotCancellable(Obstruction::PathNotUnique);
                    }
                    path.push(prev);
                    current = prev;
                }
                path.reverse();
                Cancellability::Unique(VPath::new(path))
            }
        }
    }
}
