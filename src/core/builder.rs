//! Fluent builder for lower-star [`SimplicialComplex`]es.
//!
//! [`ComplexBuilder`] takes one function value per vertex plus index lists of
//! edges and triangles and assigns every simplex its value and perturbation
//! keys by the lower-star rule:
//!
//! | Simplex | Value | Perturbation |
//! |---|---|---|
//! | vertex `v` | `f(v)` | `Single(LOWEST_PERTURBATION)` |
//! | edge `{a, b}`, `f(a) ≥ f(b)` | `f(a)` | `Single(f(b))` |
//! | triangle `{a, b, c}`, `f(a) ≥ f(b) ≥ f(c)` | `f(a)` | `Pair(f(b), f(c))` |
//!
//! Under the filtration order every face then sorts before its cofaces.
//! Callers needing other assignments use [`SimplicialComplex`] directly.
//!
//! # Examples
//!
//! ```rust
//! use discrete_morse::core::builder::ComplexBuilder;
//!
//! let values = [0.0, 1.0, 2.0, 3.0];
//! let complex = ComplexBuilder::new(&values)
//!     .triangle([0, 1, 2])
//!     .triangle([1, 2, 3])
//!     .build()
//!     .unwrap();
//!
//! // The shared edge {1, 2} is created once.
//! assert_eq!(complex.number_of_edges(), 5);
//! assert_eq!(complex.euler_characteristic(), 1);
//! ```
//!
//! Grids are available for tests and benchmarks:
//!
//! ```rust
//! use discrete_morse::core::builder::generate_random_grid_complex;
//!
//! let a = generate_random_grid_complex(4, 5, 7).unwrap();
//! let b = generate_random_grid_complex(4, 5, 7).unwrap();
//! assert_eq!(a.number_of_triangles(), 2 * 3 * 4);
//! assert_eq!(a.number_of_simplices(), b.number_of_simplices());
//! ```

#![forbid(unsafe_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::collections::{Entry, FastHashMap, fast_hash_map_with_capacity};
use super::complex::{ComplexError, SimplicialComplex};
use super::simplex::{EdgeKey, LOWEST_PERTURBATION, VertexKey};

/// Errors raised while building a lower-star complex.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BuilderError {
    /// A vertex value is NaN or infinite.
    #[error("Vertex {index} has non-finite value {value}")]
    NonFiniteValue {
        /// Index of the offending vertex.
        index: usize,
        /// The rejected value.
        value: f64,
    },
    /// A simplex references a vertex index past the end of the value list.
    #[error("Vertex index {index} out of range for {count} vertices")]
    VertexIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of vertices supplied.
        count: usize,
    },
    /// An edge repeats a vertex.
    #[error("Degenerate edge {edge:?}")]
    DegenerateEdge {
        /// The offending index pair.
        edge: [usize; 2],
    },
    /// A triangle repeats a vertex.
    #[error("Degenerate triangle {triangle:?}")]
    DegenerateTriangle {
        /// The offending index triple.
        triangle: [usize; 3],
    },
    /// A grid was given the wrong number of values.
    #[error("Expected {expected} vertex values, got {actual}")]
    ValueCountMismatch {
        /// `rows * cols`.
        expected: usize,
        /// Values supplied.
        actual: usize,
    },
    /// Grids need at least one quad.
    #[error("Grid must be at least 2x2, got {rows}x{cols}")]
    GridTooSmall {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },
    /// The underlying complex rejected a simplex.
    #[error(transparent)]
    Complex(#[from] ComplexError),
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builds a lower-star [`SimplicialComplex`] from vertex values and index lists.
#[derive(Clone, Debug)]
pub struct ComplexBuilder<'v> {
    values: &'v [f64],
    edges: Vec<[usize; 2]>,
    triangles: Vec<[usize; 3]>,
}

impl<'v> ComplexBuilder<'v> {
    /// Starts a builder with one vertex per entry of `values`.
    #[must_use]
    pub const fn new(values: &'v [f64]) -> Self {
        Self {
            values,
            edges: Vec::new(),
            triangles: Vec::new(),
        }
    }

    /// Adds an edge that need not bound any triangle.
    #[must_use]
    pub fn edge(mut self, edge: [usize; 2]) -> Self {
        self.edges.push(edge);
        self
    }

    /// Adds a triangle; its three edges are created on demand.
    #[must_use]
    pub fn triangle(mut self, triangle: [usize; 3]) -> Self {
        self.triangles.push(triangle);
        self
    }

    /// Adds many triangles at once.
    #[must_use]
    pub fn triangles(mut self, triangles: impl IntoIterator<Item = [usize; 3]>) -> Self {
        self.triangles.extend(triangles);
        self
    }

    /// Builds the complex.
    ///
    /// Vertices are inserted in index order, then edges in order of first
    /// appearance (explicit edges before triangle edges), then triangles in
    /// the order given.
    ///
    /// # Errors
    ///
    /// Returns a [`BuilderError`] for non-finite values, out-of-range or
    /// repeated indices, and duplicate triangles.
    pub fn build(&self) -> Result<SimplicialComplex, BuilderError> {
        let values = self.values;
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(BuilderError::NonFiniteValue { index, value });
            }
        }
        let check = |index: usize| {
            if index < values.len() {
                Ok(())
            } else {
                Err(BuilderError::VertexIndexOutOfRange {
                    index,
                    count: values.len(),
                })
            }
        };
        for &[a, b] in &self.edges {
            check(a)?;
            check(b)?;
            if a == b {
                return Err(BuilderError::DegenerateEdge { edge: [a, b] });
            }
        }
        for &[a, b, c] in &self.triangles {
            check(a)?;
            check(b)?;
            check(c)?;
            if a == b || b == c || a == c {
                return Err(BuilderError::DegenerateTriangle {
                    triangle: [a, b, c],
                });
            }
        }

        let edge_estimate = self.edges.len() + 3 * self.triangles.len();
        let mut complex =
            SimplicialComplex::with_capacity(values.len(), edge_estimate, self.triangles.len());

        let mut vertex_keys: Vec<VertexKey> = Vec::with_capacity(values.len());
        for &value in values {
            vertex_keys.push(complex.add_vertex(value, LOWEST_PERTURBATION)?);
        }

        let mut edge_keys: FastHashMap<[usize; 2], EdgeKey> =
            fast_hash_map_with_capacity(edge_estimate);
        let triangle_edges = self
            .triangles
            .iter()
            .flat_map(|&[a, b, c]| [[a, b], [b, c], [a, c]]);
        for [a, b] in self.edges.iter().copied().chain(triangle_edges) {
            let sorted = if a < b { [a, b] } else { [b, a] };
            if let Entry::Vacant(slot) = edge_keys.entry(sorted) {
                let (high, low) = if values[a] >= values[b] {
                    (values[a], values[b])
                } else {
                    (values[b], values[a])
                };
                slot.insert(complex.add_edge(vertex_keys[a], vertex_keys[b], high, low)?);
            }
        }

        for &[a, b, c] in &self.triangles {
            let edge_key = |x: usize, y: usize| edge_keys[&if x < y { [x, y] } else { [y, x] }];
            let mut sorted = [values[a], values[b], values[c]];
            sorted.sort_by(|x, y| y.total_cmp(x));
            complex.add_triangle(
                [edge_key(a, b), edge_key(b, c), edge_key(a, c)],
                sorted[0],
                (sorted[1], sorted[2]),
            )?;
        }

        Ok(complex)
    }
}

// =============================================================================
// GRID GENERATORS
// =============================================================================

/// Triangles of a `rows × cols` vertex grid, two per quad, row-major.
fn grid_triangles(rows: usize, cols: usize) -> impl Iterator<Item = [usize; 3]> {
    (0..rows - 1).flat_map(move |r| {
        (0..cols - 1).flat_map(move |c| {
            let i = r * cols + c;
            [[i, i + 1, i + cols + 1], [i, i + cols + 1, i + cols]]
        })
    })
}

/// Builds a lower-star complex on a triangulated `rows × cols` grid.
///
/// `values` are given row-major. Each quad is split along its main diagonal.
///
/// # Errors
///
/// Returns [`BuilderError::GridTooSmall`] for fewer than two rows or columns,
/// [`BuilderError::ValueCountMismatch`] if `values.len() != rows * cols`, or
/// any error from [`ComplexBuilder::build`].
///
/// # Examples
///
/// ```rust
/// use discrete_morse::core::builder::generate_grid_complex;
///
/// let values: Vec<f64> = (0..9).map(f64::from).collect();
/// let complex = generate_grid_complex(3, 3, &values).unwrap();
/// assert_eq!(complex.number_of_vertices(), 9);
/// assert_eq!(complex.number_of_edges(), 16);
/// assert_eq!(complex.number_of_triangles(), 8);
/// ```
pub fn generate_grid_complex(
    rows: usize,
    cols: usize,
    values: &[f64],
) -> Result<SimplicialComplex, BuilderError> {
    if rows < 2 || cols < 2 {
        return Err(BuilderError::GridTooSmall { rows, cols });
    }
    let expected = rows * cols;
    if values.len() != expected {
        return Err(BuilderError::ValueCountMismatch {
            expected,
            actual: values.len(),
        });
    }
    ComplexBuilder::new(values)
        .triangles(grid_triangles(rows, cols))
        .build()
}

/// Builds a grid complex with seeded uniform values in `[0, 1)`.
///
/// The same seed always yields the same complex.
///
/// # Errors
///
/// Returns [`BuilderError::GridTooSmall`] for fewer than two rows or columns.
pub fn generate_random_grid_complex(
    rows: usize,
    cols: usize,
    seed: u64,
) -> Result<SimplicialComplex, BuilderError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let values: Vec<f64> = (0..rows * cols)
        .map(|_| rng.random_range(0.0..1.0))
        .collect();
    generate_grid_complex(rows, cols, &values)
}
