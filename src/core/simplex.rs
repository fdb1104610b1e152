//! Typed simplex handles and symbolic perturbation keys.
//!
//! Simplices live in per-dimension storage maps inside
//! [`SimplicialComplex`](crate::core::complex::SimplicialComplex) and are
//! addressed through the typed keys defined here. [`Simplex`] is the
//! dimension-tagged handle used wherever code must treat vertices, edges and
//! triangles uniformly (filtrations, V-paths, the critical-point set).

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::cmp::Ordering;
use std::fmt;

// =============================================================================
// KEY TYPES
// =============================================================================

new_key_type! {
    /// Key type for accessing vertices (0-simplices) in the complex.
    pub struct VertexKey;
}

new_key_type! {
    /// Key type for accessing edges (1-simplices) in the complex.
    pub struct EdgeKey;
}

new_key_type! {
    /// Key type for accessing triangles (2-simplices) in the complex.
    pub struct TriangleKey;
}

// =============================================================================
// SIMPLEX HANDLE
// =============================================================================

/// A handle to a simplex of dimension 0, 1 or 2.
///
/// The variant is the dimension; the payload is the key into the matching
/// storage map of the owning complex. Handles are `Copy` and carry no data of
/// their own.
///
/// # Examples
///
/// ```rust
/// use discrete_morse::core::complex::SimplicialComplex;
/// use discrete_morse::core::simplex::Simplex;
///
/// let mut complex = SimplicialComplex::new();
/// let v = complex.add_vertex(0.0, 0.0).unwrap();
///
/// let s = Simplex::from(v);
/// assert_eq!(s.dim(), 0);
/// assert_eq!(s.as_vertex(), Some(v));
/// assert_eq!(s.as_edge(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Simplex {
    /// A 0-simplex.
    Vertex(VertexKey),
    /// A 1-simplex.
    Edge(EdgeKey),
    /// A 2-simplex.
    Triangle(TriangleKey),
}

impl Simplex {
    /// Returns the dimension of the simplex.
    #[inline]
    #[must_use]
    pub const fn dim(self) -> u8 {
        match self {
            Self::Vertex(_) => 0,
            Self::Edge(_) => 1,
            Self::Triangle(_) => 2,
        }
    }

    /// Returns the vertex key if this is a vertex.
    #[inline]
    #[must_use]
    pub const fn as_vertex(self) -> Option<VertexKey> {
        match self {
            Self::Vertex(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the edge key if this is an edge.
    #[inline]
    #[must_use]
    pub const fn as_edge(self) -> Option<EdgeKey> {
        match self {
            Self::Edge(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the triangle key if this is a triangle.
    #[inline]
    #[must_use]
    pub const fn as_triangle(self) -> Option<TriangleKey> {
        match self {
            Self::Triangle(t) => Some(t),
            _ => None,
        }
    }
}

impl From<VertexKey> for Simplex {
    #[inline]
    fn from(key: VertexKey) -> Self {
        Self::Vertex(key)
    }
}

impl From<EdgeKey> for Simplex {
    #[inline]
    fn from(key: EdgeKey) -> Self {
        Self::Edge(key)
    }
}

impl From<TriangleKey> for Simplex {
    #[inline]
    fn from(key: TriangleKey) -> Self {
        Self::Triangle(key)
    }
}

impl fmt::Display for Simplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex(v) => write!(f, "Vertex({v:?})"),
            Self::Edge(e) => write!(f, "Edge({e:?})"),
            Self::Triangle(t) => write!(f, "Triangle({t:?})"),
        }
    }
}

// =============================================================================
// SYMBOLIC PERTURBATION
// =============================================================================

/// The smallest perturbation key.
///
/// Lower-star complexes give every vertex this key so a vertex sorts before
/// every edge and triangle sharing its function value.
pub const LOWEST_PERTURBATION: f64 = f64::MIN;

/// Symbolic perturbation key(s) of a simplex.
///
/// Vertices and edges carry a single key, triangles an ordered pair. Keys only
/// break ties between equal function values; they carry no other meaning.
///
/// Perturbations compare lexicographically: a `Single(a)` against a
/// `Pair(b1, b2)` compares `a` with `b1` and, when those are equal, the
/// `Single` sorts first.
///
/// # Examples
///
/// ```rust
/// use discrete_morse::core::simplex::Perturbation;
/// use std::cmp::Ordering;
///
/// let edge = Perturbation::Single(0.5);
/// let triangle = Perturbation::Pair(0.5, 0.25);
///
/// assert_eq!(edge.cmp_lexicographic(&triangle), Ordering::Less);
/// assert_eq!(triangle.primary(), 0.5);
/// assert_eq!(triangle.secondary(), Some(0.25));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Perturbation {
    /// One key (vertices and edges).
    Single(f64),
    /// Two keys, compared in order (triangles).
    Pair(f64, f64),
}

impl Perturbation {
    /// The first key.
    #[inline]
    #[must_use]
    pub const fn primary(&self) -> f64 {
        match *self {
            Self::Single(k) | Self::Pair(k, _) => k,
        }
    }

    /// The second key, if any.
    #[inline]
    #[must_use]
    pub const fn secondary(&self) -> Option<f64> {
        match *self {
            Self::Single(_) => None,
            Self::Pair(_, k) => Some(k),
        }
    }

    /// Returns `true` if every key is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.primary().is_finite() && self.secondary().is_none_or(f64::is_finite)
    }

    /// Lexicographic comparison using [`f64::total_cmp`] on each key.
    #[must_use]
    pub fn cmp_lexicographic(&self, other: &Self) -> Ordering {
        self.primary()
            .total_cmp(&other.primary())
            .then_with(|| match (self.secondary(), other.secondary()) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => a.total_cmp(&b),
            })
    }
}
