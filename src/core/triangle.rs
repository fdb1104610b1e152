//! Triangle records (2-simplices).

#![forbid(unsafe_code)]

use super::simplex::{EdgeKey, Perturbation, VertexKey};

/// A triangle of a simplicial 2-complex.
///
/// A triangle references its three bounding edges; the three corner vertices
/// are cached at construction so vertex queries need no edge lookups.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    edges: [EdgeKey; 3],
    vertices: [VertexKey; 3],
    value: f64,
    perturbation: (f64, f64),
    pub(crate) position: Option<usize>,
}

impl Triangle {
    pub(crate) const fn new(
        edges: [EdgeKey; 3],
        vertices: [VertexKey; 3],
        value: f64,
        perturbation: (f64, f64),
    ) -> Self {
        Self {
            edges,
            vertices,
            value,
            perturbation,
            position: None,
        }
    }

    /// The three bounding edges, in construction order.
    #[inline]
    #[must_use]
    pub const fn edges(&self) -> [EdgeKey; 3] {
        self.edges
    }

    /// The three corner vertices.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [VertexKey; 3] {
        self.vertices
    }

    /// The function value of the triangle.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// The perturbation keys, as a [`Perturbation::Pair`].
    #[inline]
    #[must_use]
    pub const fn perturbation(&self) -> Perturbation {
        Perturbation::Pair(self.perturbation.0, self.perturbation.1)
    }

    /// Position in the filtration, once one has been built.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        self.position
    }

    /// Returns `true` if `edge` bounds this triangle.
    #[inline]
    #[must_use]
    pub fn has_edge(&self, edge: EdgeKey) -> bool {
        self.edges.contains(&edge)
    }
}
