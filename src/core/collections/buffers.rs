use crate::core::simplex::{EdgeKey, Simplex, TriangleKey};

use super::SmallBuffer;

// =============================================================================
// INCIDENCE BUFFER TYPES
// =============================================================================

/// Inline capacity for the edges incident to a vertex.
///
/// Interior vertices of regular surface meshes have degree 6; 8 leaves
/// headroom before spilling to the heap.
pub const VERTEX_DEGREE_BUFFER_SIZE: usize = 8;

/// Edges incident to a vertex (the vertex's coboundary).
pub type IncidentEdgeBuffer = SmallBuffer<EdgeKey, VERTEX_DEGREE_BUFFER_SIZE>;

/// Triangles incident to an edge (the edge's coboundary).
///
/// An edge of a 2-manifold has at most two cofaces; non-manifold edges spill.
pub type IncidentTriangleBuffer = SmallBuffer<TriangleKey, 2>;

/// Sorted filtration indices of a simplex's boundary faces (0, 2 or 3 entries).
pub type BoundaryFaceBuffer = SmallBuffer<usize, 3>;

/// Codimension-1 faces of a simplex: two vertices for an edge, three edges for a triangle.
pub type NeighborSimplexBuffer = SmallBuffer<Simplex, 3>;
