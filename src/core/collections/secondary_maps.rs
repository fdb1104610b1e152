use crate::core::simplex::{EdgeKey, TriangleKey, VertexKey};
use slotmap::SecondaryMap;

// =============================================================================
// SLOTMAP SECONDARY MAPS FOR AUXILIARY DATA
// =============================================================================

/// Secondary map associating auxiliary data with vertices.
///
/// Dense secondary maps iterate in key order, which keeps any traversal over
/// them reproducible.
///
/// # Examples
///
/// ```rust
/// use discrete_morse::core::collections::VertexSecondaryMap;
/// use discrete_morse::core::complex::SimplicialComplex;
///
/// let mut complex = SimplicialComplex::new();
/// let v = complex.add_vertex(1.0, 0.0).unwrap();
///
/// let mut marks: VertexSecondaryMap<bool> = VertexSecondaryMap::new();
/// marks.insert(v, true);
/// assert_eq!(marks.get(v), Some(&true));
/// ```
pub type VertexSecondaryMap<V> = SecondaryMap<VertexKey, V>;

/// Secondary map associating auxiliary data with edges.
pub type EdgeSecondaryMap<V> = SecondaryMap<EdgeKey, V>;

/// Secondary map associating auxiliary data with triangles.
pub type TriangleSecondaryMap<V> = SecondaryMap<TriangleKey, V>;
