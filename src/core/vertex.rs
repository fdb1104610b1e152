//! Vertex records (0-simplices).
//!
//! A [`Vertex`] carries the scalar function value sampled at the vertex, its
//! symbolic perturbation key, the filtration position assigned by
//! [`Filtration::build`](crate::core::filtration::Filtration::build), and the
//! keys of its incident edges (its coboundary).
//!
//! # Examples
//!
//! ```rust
//! use discrete_morse::core::complex::SimplicialComplex;
//!
//! let mut complex = SimplicialComplex::new();
//! let v = complex.add_vertex(2.5, -1.0).unwrap();
//!
//! let vertex = complex.vertex(v).unwrap();
//! assert_eq!(vertex.value(), 2.5);
//! assert_eq!(vertex.degree(), 0);
//! assert_eq!(vertex.position(), None);
//! ```

#![forbid(unsafe_code)]

use super::collections::IncidentEdgeBuffer;
use super::simplex::{EdgeKey, Perturbation};

/// A vertex of a simplicial 2-complex.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    /// Scalar function value.
    value: f64,
    /// Single perturbation key.
    perturbation: f64,
    /// Index in the most recently built filtration.
    pub(crate) position: Option<usize>,
    /// Incident edges, in insertion order.
    pub(crate) edges: IncidentEdgeBuffer,
}

impl Vertex {
    pub(crate) fn new(value: f64, perturbation: f64) -> Self {
        Self {
            value,
            perturbation,
            position: None,
            edges: IncidentEdgeBuffer::new(),
        }
    }

    /// The function value at this vertex.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// The perturbation key, as a [`Perturbation::Single`].
    #[inline]
    #[must_use]
    pub const fn perturbation(&self) -> Perturbation {
        Perturbation::Single(self.perturbation)
    }

    /// Position in the filtration, once one has been built.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        self.position
    }

    /// Edges having this vertex as an endpoint.
    #[inline]
    #[must_use]
    pub fn edges(&self) -> &[EdgeKey] {
        &self.edges
    }

    /// Number of incident edges.
    #[inline]
    #[must_use]
    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}
