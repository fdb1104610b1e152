//! Discrete gradient vector field: a partial matching between adjacent dimensions.
//!
//! [`GradientField`] stores vertex–edge and edge–triangle pairs in both
//! directions. A simplex takes part in at most one pair; the mutation methods
//! refuse any change that would break this.
//!
//! # Examples
//!
//! ```rust
//! use discrete_morse::core::builder::ComplexBuilder;
//! use discrete_morse::core::gradient::{GradientField, GradientFieldError};
//!
//! let complex = ComplexBuilder::new(&[0.0, 1.0]).edge([0, 1]).build().unwrap();
//! let (v, _) = complex.vertices().next().unwrap();
//! let (e, _) = complex.edges().next().unwrap();
//!
//! let mut gradient = GradientField::new();
//! gradient.add_vertex_edge(v, e).unwrap();
//! assert_eq!(gradient.edge_of_vertex(v), Some(e));
//! assert_eq!(gradient.vertex_of_edge(e), Some(v));
//!
//! assert!(matches!(
//!     gradient.add_vertex_edge(v, e),
//!     Err(GradientFieldError::AlreadyMatched { .. })
//! ));
//! gradient.remove_vertex_edge(v, e).unwrap();
//! assert!(gradient.is_empty());
//! ```

#![forbid(unsafe_code)]

use thiserror::Error;

use super::collections::{EdgeSecondaryMap, TriangleSecondaryMap, VertexSecondaryMap};
use super::simplex::{EdgeKey, Simplex, TriangleKey, VertexKey};

/// Errors raised by [`GradientField`] mutations.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GradientFieldError {
    /// One side of the requested pair is already matched.
    #[error("Cannot pair {lower} with {higher}: {matched} is already matched")]
    AlreadyMatched {
        /// Lower-dimensional side of the requested pair.
        lower: Simplex,
        /// Higher-dimensional side of the requested pair.
        higher: Simplex,
        /// The side that already has a partner.
        matched: Simplex,
    },
    /// The pair to remove is not in the field.
    #[error("Pair ({lower}, {higher}) is not in the gradient field")]
    PairNotFound {
        /// Lower-dimensional side.
        lower: Simplex,
        /// Higher-dimensional side.
        higher: Simplex,
    },
}

/// A partial matching of vertices with edges and edges with triangles.
#[derive(Clone, Debug, Default)]
pub struct GradientField {
    vertex_to_edge: VertexSecondaryMap<EdgeKey>,
    edge_to_vertex: EdgeSecondaryMap<VertexKey>,
    edge_to_triangle: EdgeSecondaryMap<TriangleKey>,
    triangle_to_edge: TriangleSecondaryMap<EdgeKey>,
}

impl GradientField {
    /// Creates an empty field (every simplex critical).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The edge paired with `vertex`.
    #[inline]
    #[must_use]
    pub fn edge_of_vertex(&self, vertex: VertexKey) -> Option<EdgeKey> {
        self.vertex_to_edge.get(vertex).copied()
    }

    /// The vertex paired with `edge`.
    #[inline]
    #[must_use]
    pub fn vertex_of_edge(&self, edge: EdgeKey) -> Option<VertexKey> {
        self.edge_to_vertex.get(edge).copied()
    }

    /// The triangle paired with `edge`.
    #[inline]
    #[must_use]
    pub fn triangle_of_edge(&self, edge: EdgeKey) -> Option<TriangleKey> {
        self.edge_to_triangle.get(edge).copied()
    }

    /// The edge paired with `triangle`.
    #[inline]
    #[must_use]
    pub fn edge_of_triangle(&self, triangle: TriangleKey) -> Option<EdgeKey> {
        self.triangle_to_edge.get(triangle).copied()
    }

    /// The partner of any simplex, in whichever direction it is matched.
    #[must_use]
    pub fn partner(&self, simplex: Simplex) -> Option<Simplex> {
        match simplex {
            Simplex::Vertex(v) => self.edge_of_vertex(v).map(Simplex::Edge),
            Simplex::Edge(e) => self
                .vertex_of_edge(e)
                .map(Simplex::Vertex)
                .or_else(|| self.triangle_of_edge(e).map(Simplex::Triangle)),
            Simplex::Triangle(t) => self.edge_of_triangle(t).map(Simplex::Edge),
        }
    }

    /// Returns `true` if `simplex` belongs to a pair.
    #[must_use]
    pub fn is_matched(&self, simplex: Simplex) -> bool {
        self.partner(simplex).is_some()
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertex_to_edge.len() + self.edge_to_triangle.len()
    }

    /// Returns `true` if no simplex is matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vertex–edge pairs.
    pub fn vertex_edge_pairs(&self) -> impl Iterator<Item = (VertexKey, EdgeKey)> + '_ {
        self.vertex_to_edge.iter().map(|(v, &e)| (v, e))
    }

    /// Edge–triangle pairs.
    pub fn edge_triangle_pairs(&self) -> impl Iterator<Item = (EdgeKey, TriangleKey)> + '_ {
        self.edge_to_triangle.iter().map(|(e, &t)| (e, t))
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Pairs `vertex` with `edge`.
    ///
    /// # Errors
    ///
    /// Returns [`GradientFieldError::AlreadyMatched`] if either side already
    /// has a partner.
    pub fn add_vertex_edge(&mut self, vertex: VertexKey, edge: EdgeKey) -> Result<(), GradientFieldError> {
        self.ensure_unmatched(Simplex::Vertex(vertex), Simplex::Edge(edge))?;
        self.vertex_to_edge.insert(vertex, edge);
        self.edge_to_vertex.insert(edge, vertex);
        Ok(())
    }

    /// Removes the pair (`vertex`, `edge`).
    ///
    /// # Errors
    ///
    /// Returns [`GradientFieldError::PairNotFound`] if the two are not paired.
    pub fn remove_vertex_edge(&mut self, vertex: VertexKey, edge: EdgeKey) -> Result<(), GradientFieldError> {
        if self.edge_of_vertex(vertex) != Some(edge) {
            return Err(GradientFieldError::PairNotFound {
                lower: Simplex::Vertex(vertex),
                higher: Simplex::Edge(edge),
            });
        }
        self.vertex_to_edge.remove(vertex);
        self.edge_to_vertex.remove(edge);
        Ok(())
    }

    /// Pairs `edge` with `triangle`.
    ///
    /// # Errors
    ///
    /// Returns [`GradientFieldError::AlreadyMatched`] if either side already
    /// has a partner.
    pub fn add_edge_triangle(&mut self, edge: EdgeKey, triangle: TriangleKey) -> Result<(), GradientFieldError> {
        self.ensure_unmatched(Simplex::Edge(edge), Simplex::Triangle(triangle))?;
        self.edge_to_triangle.insert(edge, triangle);
        self.triangle_to_edge.insert(triangle, edge);
        Ok(())
    }

    /// Removes the pair (`edge`, `triangle`).
    ///
    /// # Errors
    ///
    /// Returns [`GradientFieldError::PairNotFound`] if the two are not paired.
    pub fn remove_edge_triangle(&mut self, edge: EdgeKey, triangle: TriangleKey) -> Result<(), GradientFieldError> {
        if self.triangle_of_edge(edge) != Some(triangle) {
            return Err(GradientFieldError::PairNotFound {
                lower: Simplex::Edge(edge),
                higher: Simplex::Triangle(triangle),
            });
        }
        self.edge_to_triangle.remove(edge);
        self.triangle_to_edge.remove(triangle);
        Ok(())
    }

    /// Pairs two simplices of adjacent dimension, lower first.
    ///
    /// # Errors
    ///
    /// Returns [`GradientFieldError::AlreadyMatched`] as the typed adders do,
    /// and [`GradientFieldError::PairNotFound`] if the dimensions are not
    /// `(0, 1)` or `(1, 2)`.
    pub fn add_pair(&mut self, lower: Simplex, higher: Simplex) -> Result<(), GradientFieldError> {
        match (lower, higher) {
            (Simplex::Vertex(v), Simplex::Edge(e)) => self.add_vertex_edge(v, e),
            (Simplex::Edge(e), Simplex::Triangle(t)) => self.add_edge_triangle(e, t),
            _ => Err(GradientFieldError::PairNotFound { lower, higher }),
        }
    }

    /// Removes a pair of adjacent-dimension simplices, lower first.
    ///
    /// # Errors
    ///
    /// Returns [`GradientFieldError::PairNotFound`] if the pair is absent or
    /// the dimensions do not fit.
    pub fn remove_pair(&mut self, lower: Simplex, higher: Simplex) -> Result<(), GradientFieldError> {
        match (lower, higher) {
            (Simplex::Vertex(v), Simplex::Edge(e)) => self.remove_vertex_edge(v, e),
            (Simplex::Edge(e), Simplex::Triangle(t)) => self.remove_edge_triangle(e, t),
            _ => Err(GradientFieldError::PairNotFound { lower, higher }),
        }
    }

    fn ensure_unmatched(&self, lower: Simplex, higher: Simplex) -> Result<(), GradientFieldError> {
        for side in [lower, higher] {
            if self.is_matched(side) {
                return Err(GradientFieldError::AlreadyMatched {
                    lower,
                    higher,
                    matched: side,
                });
            }
        }
        Ok(())
    }
}
