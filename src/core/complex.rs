//! The simplicial 2-complex carrying a scalar field.
//!
//! [`SimplicialComplex`] owns every vertex, edge and triangle together with
//! their function values, perturbation keys, boundary and coboundary
//! incidence, filtration positions and the set of currently critical
//! simplices. Simplification code only reads it, annotates filtration
//! positions, and shrinks the critical set.
//!
//! # Construction
//!
//! Simplices are added bottom-up: vertices first, then edges between existing
//! vertices, then triangles closing three existing edges. Each call validates
//! its input and returns a typed key.
//!
//! ```rust
//! use discrete_morse::core::complex::SimplicialComplex;
//!
//! let mut complex = SimplicialComplex::new();
//! let a = complex.add_vertex(0.0, 0.0).unwrap();
//! let b = complex.add_vertex(1.0, 0.0).unwrap();
//! let c = complex.add_vertex(2.0, 0.0).unwrap();
//!
//! let ab = complex.add_edge(a, b, 1.0, 0.0).unwrap();
//! let bc = complex.add_edge(b, c, 2.0, 1.0).unwrap();
//! let ac = complex.add_edge(a, c, 2.0, 0.0).unwrap();
//! let abc = complex.add_triangle([ab, bc, ac], 2.0, (1.0, 0.0)).unwrap();
//!
//! assert_eq!(complex.number_of_simplices(), 7);
//! assert_eq!(complex.euler_characteristic(), 1);
//! assert_eq!(complex.edge_between(c, a), Some(ac));
//! assert!(complex.triangle_has_edge(abc, bc));
//! assert!(complex.validate().is_ok());
//! ```
//!
//! # Critical simplices
//!
//! Every simplex is critical when created. The cancellation driver removes
//! both endpoints of each cancelled pair; [`SimplicialComplex::reset_critical_simplices`]
//! restores the initial state.

#![forbid(unsafe_code)]

use thiserror::Error;

use super::collections::{NeighborSimplexBuffer, SimplexSet, StorageMap, fast_hash_set_with_capacity};
use super::edge::Edge;
use super::filtration::OrderKey;
use super::simplex::{EdgeKey, Perturbation, Simplex, TriangleKey, VertexKey};
use super::triangle::Triangle;
use super::vertex::Vertex;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised while building or validating a [`SimplicialComplex`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ComplexError {
    /// A vertex key does not belong to this complex.
    #[error("Vertex {0:?} does not exist in the complex")]
    VertexNotFound(VertexKey),
    /// An edge key does not belong to this complex.
    #[error("Edge {0:?} does not exist in the complex")]
    EdgeNotFound(EdgeKey),
    /// A triangle key does not belong to this complex.
    #[error("Triangle {0:?} does not exist in the complex")]
    TriangleNotFound(TriangleKey),
    /// Both endpoints of an edge are the same vertex.
    #[error("Degenerate edge: both endpoints are {vertex:?}")]
    DegenerateEdge {
        /// The repeated endpoint.
        vertex: VertexKey,
    },
    /// An edge between the two vertices already exists.
    #[error("Duplicate edge between {a:?} and {b:?}: {existing:?} already connects them")]
    DuplicateEdge {
        /// First endpoint.
        a: VertexKey,
        /// Second endpoint.
        b: VertexKey,
        /// The edge already present.
        existing: EdgeKey,
    },
    /// The three edges do not close a triangle on three distinct vertices.
    #[error("Edges {edges:?} do not bound a triangle: {message}")]
    InvalidTriangle {
        /// The offending edges.
        edges: [EdgeKey; 3],
        /// Why they were rejected.
        message: String,
    },
    /// A triangle on the same three edges already exists.
    #[error("Duplicate triangle: {existing:?} already has the same boundary")]
    DuplicateTriangle {
        /// The triangle already present.
        existing: TriangleKey,
    },
    /// A function value or perturbation key was NaN or infinite.
    #[error("Non-finite {what}: {value}")]
    NonFinite {
        /// Which quantity was rejected.
        what: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// Boundary and coboundary incidence disagree.
    #[error("Incidence inconsistency: {message}")]
    InconsistentIncidence {
        /// Description of the mismatch.
        message: String,
    },
}

fn ensure_finite(what: &'static str, value: f64) -> Result<(), ComplexError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ComplexError::NonFinite { what, value })
    }
}

// =============================================================================
// SIMPLICIAL COMPLEX
// =============================================================================

/// A simplicial 2-complex with a scalar function on its simplices.
#[derive(Clone, Debug, Default)]
pub struct SimplicialComplex {
    vertices: StorageMap<VertexKey, Vertex>,
    edges: StorageMap<EdgeKey, Edge>,
    triangles: StorageMap<TriangleKey, Triangle>,
    critical: SimplexSet,
}

impl SimplicialComplex {
    /// Creates an empty complex.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty complex with room for the given number of simplices.
    #[must_use]
    pub fn with_capacity(vertices: usize, edges: usize, triangles: usize) -> Self {
        Self {
            vertices: StorageMap::with_capacity_and_key(vertices),
            edges: StorageMap::with_capacity_and_key(edges),
            triangles: StorageMap::with_capacity_and_key(triangles),
            critical: fast_hash_set_with_capacity(vertices + edges + triangles),
        }
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Adds a vertex with the given function value and perturbation key.
    ///
    /// # Errors
    ///
    /// Returns [`ComplexError::NonFinite`] if either number is NaN or infinite.
    pub fn add_vertex(&mut self, value: f64, perturbation: f64) -> Result<VertexKey, ComplexError> {
        ensure_finite("vertex value", value)?;
        ensure_finite("vertex perturbation", perturbation)?;

        let key = self.vertices.insert(Vertex::new(value, perturbation));
        self.critical.insert(Simplex::Vertex(key));
        Ok(key)
    }

    /// Adds the edge `{a, b}` with the given function value and perturbation key.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint is unknown, `a == b`, the edge already
    /// exists, or a number is not finite.
    pub fn add_edge(
        &mut self,
        a: VertexKey,
        b: VertexKey,
        value: f64,
        perturbation: f64,
    ) -> Result<EdgeKey, ComplexError> {
        ensure_finite("edge value", value)?;
        ensure_finite("edge perturbation", perturbation)?;
        if !self.vertices.contains_key(a) {
            return Err(ComplexError::VertexNotFound(a));
        }
        if !self.vertices.contains_key(b) {
            return Err(ComplexError::VertexNotFound(b));
        }
        if a == b {
            return Err(ComplexError::DegenerateEdge { vertex: a });
        }
        if let Some(existing) = self.edge_between(a, b) {
            return Err(ComplexError::DuplicateEdge { a, b, existing });
        }

        let key = self.edges.insert(Edge::new([a, b], value, perturbation));
        for endpoint in [a, b] {
            if let Some(vertex) = self.vertices.get_mut(endpoint) {
                vertex.edges.push(key);
            }
        }
        self.critical.insert(Simplex::Edge(key));
        Ok(key)
    }

    /// Adds the triangle bounded by `edges` with the given function value and
    /// perturbation key pair.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge is unknown or repeated, the edges do not
    /// close a 3-cycle, the triangle already exists, or a number is not finite.
    pub fn add_triangle(
        &mut self,
        edges: [EdgeKey; 3],
        value: f64,
        perturbation: (f64, f64),
    ) -> Result<TriangleKey, ComplexError> {
        ensure_finite("triangle value", value)?;
        ensure_finite("triangle perturbation", perturbation.0)?;
        ensure_finite("triangle perturbation", perturbation.1)?;

        let vertices = self.triangle_corners(edges)?;

        if let Some(first) = self.edges.get(edges[0]) {
            for &existing in &first.triangles {
                let other = &self.triangles[existing];
                if edges.iter().all(|&e| other.has_edge(e)) {
                    return Err(ComplexError::DuplicateTriangle { existing });
                }
            }
        }

        let key = self
            .triangles
            .insert(Triangle::new(edges, vertices, value, perturbation));
        for edge in edges {
            if let Some(record) = self.edges.get_mut(edge) {
                record.triangles.push(key);
            }
        }
        self.critical.insert(Simplex::Triangle(key));
        Ok(key)
    }

    /// Checks that three edges close a 3-cycle and returns its corners.
    fn triangle_corners(&self, edges: [EdgeKey; 3]) -> Result<[VertexKey; 3], ComplexError> {
        let invalid = |message: &str| ComplexError::InvalidTriangle {
            edges,
            message: message.to_string(),
        };

        if edges[0] == edges[1] || edges[1] == edges[2] || edges[0] == edges[2] {
            return Err(invalid("an edge is repeated"));
        }

        let mut endpoints = [[VertexKey::default(); 2]; 3];
        for (slot, &edge) in endpoints.iter_mut().zip(edges.iter()) {
            *slot = self
                .edges
                .get(edge)
                .ok_or(ComplexError::EdgeNotFound(edge))?
                .vertices();
        }

        let [a, b] = endpoints[0];
        let c = match endpoints[1] {
            [x, y] if x == a || x == b => y,
            [x, y] if y == a || y == b => x,
            _ => return Err(invalid("the first two edges share no vertex")),
        };
        if c == a || c == b {
            return Err(invalid("the first two edges coincide"));
        }

        // The third edge joins c to the corner of the first edge not shared with the second.
        let unshared = if endpoints[1].contains(&a) { b } else { a };
        let closes = |[x, y]: [VertexKey; 2]| (x == unshared && y == c) || (x == c && y == unshared);
        if !closes(endpoints[2]) {
            return Err(invalid("the third edge does not close the cycle"));
        }

        Ok([a, b, c])
    }

    // -------------------------------------------------------------------------
    // Counts and iteration
    // -------------------------------------------------------------------------

    /// Number of vertices.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn number_of_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn number_of_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Total number of simplices of all dimensions.
    #[must_use]
    pub fn number_of_simplices(&self) -> usize {
        self.vertices.len() + self.edges.len() + self.triangles.len()
    }

    /// Returns `true` if the complex has no simplices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.number_of_simplices() == 0
    }

    /// Iterates over vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexKey, &Vertex)> {
        self.vertices.iter()
    }

    /// Iterates over edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, &Edge)> {
        self.edges.iter()
    }

    /// Iterates over triangles in insertion order.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleKey, &Triangle)> {
        self.triangles.iter()
    }

    /// Iterates over every simplex: all vertices, then all edges, then all triangles.
    pub fn simplices(&self) -> impl Iterator<Item = Simplex> + '_ {
        self.vertices
            .keys()
            .map(Simplex::Vertex)
            .chain(self.edges.keys().map(Simplex::Edge))
            .chain(self.triangles.keys().map(Simplex::Triangle))
    }

    // -------------------------------------------------------------------------
    // Record access
    // -------------------------------------------------------------------------

    /// Returns the vertex record for `key`.
    #[must_use]
    pub fn vertex(&self, key: VertexKey) -> Option<&Vertex> {
        self.vertices.get(key)
    }

    /// Returns the edge record for `key`.
    #[must_use]
    pub fn edge(&self, key: EdgeKey) -> Option<&Edge> {
        self.edges.get(key)
    }

    /// Returns the triangle record for `key`.
    #[must_use]
    pub fn triangle(&self, key: TriangleKey) -> Option<&Triangle> {
        self.triangles.get(key)
    }

    /// Returns `true` if the simplex belongs to this complex.
    #[must_use]
    pub fn contains(&self, simplex: Simplex) -> bool {
        match simplex {
            Simplex::Vertex(v) => self.vertices.contains_key(v),
            Simplex::Edge(e) => self.edges.contains_key(e),
            Simplex::Triangle(t) => self.triangles.contains_key(t),
        }
    }

    /// Function value of any simplex.
    #[must_use]
    pub fn value(&self, simplex: Simplex) -> Option<f64> {
        match simplex {
            Simplex::Vertex(v) => self.vertices.get(v).map(Vertex::value),
            Simplex::Edge(e) => self.edges.get(e).map(Edge::value),
            Simplex::Triangle(t) => self.triangles.get(t).map(Triangle::value),
        }
    }

    /// Perturbation key(s) of any simplex.
    #[must_use]
    pub fn perturbation(&self, simplex: Simplex) -> Option<Perturbation> {
        match simplex {
            Simplex::Vertex(v) => self.vertices.get(v).map(Vertex::perturbation),
            Simplex::Edge(e) => self.edges.get(e).map(Edge::perturbation),
            Simplex::Triangle(t) => self.triangles.get(t).map(Triangle::perturbation),
        }
    }

    /// The key the filtration sorts `simplex` by.
    #[must_use]
    pub fn order_key(&self, simplex: Simplex) -> Option<OrderKey> {
        Some(OrderKey {
            value: self.value(simplex)?,
            perturbation: self.perturbation(simplex)?,
        })
    }

    /// Filtration position of any simplex, once a filtration has been built.
    #[must_use]
    pub fn position(&self, simplex: Simplex) -> Option<usize> {
        match simplex {
            Simplex::Vertex(v) => self.vertices.get(v)?.position,
            Simplex::Edge(e) => self.edges.get(e)?.position,
            Simplex::Triangle(t) => self.triangles.get(t)?.position,
        }
    }

    /// Records the filtration position of `simplex`. Returns `false` if the
    /// simplex is not in the complex.
    pub(crate) fn set_position(&mut self, simplex: Simplex, position: usize) -> bool {
        let slot = match simplex {
            Simplex::Vertex(v) => self.vertices.get_mut(v).map(|r| &mut r.position),
            Simplex::Edge(e) => self.edges.get_mut(e).map(|r| &mut r.position),
            Simplex::Triangle(t) => self.triangles.get_mut(t).map(|r| &mut r.position),
        };
        slot.map(|p| *p = Some(position)).is_some()
    }

    // -------------------------------------------------------------------------
    // Boundary and coboundary
    // -------------------------------------------------------------------------

    /// Endpoints of an edge.
    #[must_use]
    pub fn edge_vertices(&self, edge: EdgeKey) -> Option<[VertexKey; 2]> {
        self.edges.get(edge).map(Edge::vertices)
    }

    /// Bounding edges of a triangle.
    #[must_use]
    pub fn triangle_edges(&self, triangle: TriangleKey) -> Option<[EdgeKey; 3]> {
        self.triangles.get(triangle).map(Triangle::edges)
    }

    /// Corner vertices of a triangle.
    #[must_use]
    pub fn triangle_vertices(&self, triangle: TriangleKey) -> Option<[VertexKey; 3]> {
        self.triangles.get(triangle).map(Triangle::vertices)
    }

    /// Edges incident to a vertex (empty for unknown keys).
    #[must_use]
    pub fn vertex_edges(&self, vertex: VertexKey) -> &[EdgeKey] {
        self.vertices.get(vertex).map_or(&[], Vertex::edges)
    }

    /// Triangles incident to an edge (empty for unknown keys).
    #[must_use]
    pub fn edge_triangles(&self, edge: EdgeKey) -> &[TriangleKey] {
        self.edges.get(edge).map_or(&[], Edge::triangles)
    }

    /// The edge joining `a` and `b`, if any.
    #[must_use]
    pub fn edge_between(&self, a: VertexKey, b: VertexKey) -> Option<EdgeKey> {
        self.vertex_edges(a)
            .iter()
            .copied()
            .find(|&e| self.edges[e].opposite(a) == Some(b))
    }

    /// Returns `true` if `vertex` is an endpoint of `edge`.
    #[must_use]
    pub fn edge_has_vertex(&self, edge: EdgeKey, vertex: VertexKey) -> bool {
        self.edges.get(edge).is_some_and(|e| e.has_vertex(vertex))
    }

    /// Returns `true` if `edge` bounds `triangle`.
    #[must_use]
    pub fn triangle_has_edge(&self, triangle: TriangleKey, edge: EdgeKey) -> bool {
        self.triangles.get(triangle).is_some_and(|t| t.has_edge(edge))
    }

    /// Codimension-one faces of a simplex (none for vertices).
    #[must_use]
    pub fn faces(&self, simplex: Simplex) -> NeighborSimplexBuffer {
        match simplex {
            Simplex::Vertex(_) => NeighborSimplexBuffer::new(),
            Simplex::Edge(e) => self
                .edge_vertices(e)
                .map(|vs| vs.into_iter().map(Simplex::Vertex).collect())
                .unwrap_or_default(),
            Simplex::Triangle(t) => self
                .triangle_edges(t)
                .map(|es| es.into_iter().map(Simplex::Edge).collect())
                .unwrap_or_default(),
        }
    }

    // -------------------------------------------------------------------------
    // Critical simplices
    // -------------------------------------------------------------------------

    /// Returns `true` if `simplex` is currently critical.
    #[must_use]
    pub fn is_critical(&self, simplex: Simplex) -> bool {
        self.critical.contains(&simplex)
    }

    /// Number of critical simplices.
    #[must_use]
    pub fn critical_count(&self) -> usize {
        self.critical.len()
    }

    /// Critical simplices sorted by filtration position, then by dimension and key.
    ///
    /// Simplices without a position (no filtration built yet) come last.
    #[must_use]
    pub fn critical_simplices(&self) -> Vec<Simplex> {
        let mut critical: Vec<Simplex> = self.critical.iter().copied().collect();
        critical.sort_by_key(|&s| (self.position(s).unwrap_or(usize::MAX), s));
        critical
    }

    /// Removes `simplex` from the critical set, returning whether it was present.
    pub fn remove_critical(&mut self, simplex: Simplex) -> bool {
        self.critical.remove(&simplex)
    }

    /// Marks every simplex of the complex critical again.
    pub fn reset_critical_simplices(&mut self) {
        let all: Vec<Simplex> = self.simplices().collect();
        self.critical.clear();
        self.critical.extend(all);
    }

    // -------------------------------------------------------------------------
    // Topology and validation
    // -------------------------------------------------------------------------

    /// Euler characteristic χ = V − E + T.
    #[must_use]
    pub fn euler_characteristic(&self) -> i64 {
        let count = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
        count(self.vertices.len()) - count(self.edges.len()) + count(self.triangles.len())
    }

    /// Verifies that boundary and coboundary incidence agree in both directions.
    ///
    /// # Errors
    ///
    /// Returns [`ComplexError::InconsistentIncidence`] describing the first
    /// mismatch, or a not-found error for a dangling key.
    pub fn validate(&self) -> Result<(), ComplexError> {
        for (edge_key, edge) in &self.edges {
            for v in edge.vertices() {
                let vertex = self.vertices.get(v).ok_or(ComplexError::VertexNotFound(v))?;
                if !vertex.edges().contains(&edge_key) {
                    return Err(ComplexError::InconsistentIncidence {
                        message: format!("vertex {v:?} does not list incident edge {edge_key:?}"),
                    });
                }
            }
        }
        for (vertex_key, vertex) in &self.vertices {
            for &e in vertex.edges() {
                let edge = self.edges.get(e).ok_or(ComplexError::EdgeNotFound(e))?;
                if !edge.has_vertex(vertex_key) {
                    return Err(ComplexError::InconsistentIncidence {
                        message: format!("edge {e:?} is listed on {vertex_key:?} but does not contain it"),
                    });
                }
            }
        }
        for (triangle_key, triangle) in &self.triangles {
            for e in triangle.edges() {
                let edge = self.edges.get(e).ok_or(ComplexError::EdgeNotFound(e))?;
                if !edge.triangles().contains(&triangle_key) {
                    return Err(ComplexError::InconsistentIncidence {
                        message: format!("edge {e:?} does not list incident triangle {triangle_key:?}"),
                    });
                }
            }
        }
        for (edge_key, edge) in &self.edges {
            for &t in edge.triangles() {
                let triangle = self
                    .triangles
                    .get(t)
                    .ok_or(ComplexError::TriangleNotFound(t))?;
                if !triangle.has_edge(edge_key) {
                    return Err(ComplexError::InconsistentIncidence {
                        message: format!("triangle {t:?} is listed on {edge_key:?} but does not contain it"),
                    });
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
