//! Edge records (1-simplices).
//!
//! An [`Edge`] references exactly two distinct endpoint vertices and keeps the
//! triangles it bounds as its coboundary.

#![forbid(unsafe_code)]

use super::collections::IncidentTriangleBuffer;
use super::simplex::{Perturbation, TriangleKey, VertexKey};

/// An edge of a simplicial 2-complex.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    vertices: [VertexKey; 2],
    value: f64,
    perturbation: f64,
    pub(crate) position: Option<usize>,
    pub(crate) triangles: IncidentTriangleBuffer,
}

impl Edge {
    pub(crate) fn new(vertices: [VertexKey; 2], value: f64, perturbation: f64) -> Self {
        Self {
            vertices,
            value,
            perturbation,
            position: None,
            triangles: IncidentTriangleBuffer::new(),
        }
    }

    /// The two endpoints, in the order they were given at construction.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [VertexKey; 2] {
        self.vertices
    }

    /// The function value of the edge.
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

    /// Triangles having this edge on their boundary.
    #[inline]
    #[must_use]
    pub fn triangles(&self) -> &[TriangleKey] {
        &self.triangles
    }

    /// Returns `true` if `vertex` is one of the endpoints.
    #[inline]
    #[must_use]
    pub fn has_vertex(&self, vertex: VertexKey) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Returns the endpoint opposite `vertex`, or `None` if `vertex` is not an endpoint.
    #[must_use]
    pub fn opposite(&self, vertex: VertexKey) -> Option<VertexKey> {
        match self.vertices {
            [a, b] if a == vertex => Some(b),
            [a, b] if b == vertex => Some(a),
            _ => None,
        }
    }
}
