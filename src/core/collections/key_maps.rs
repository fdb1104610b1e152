use super::{FastHashMap, FastHashSet};
use crate::core::simplex::Simplex;

// =============================================================================
// KEY-BASED SIMPLEX COLLECTIONS
// =============================================================================

/// Set of simplices of any dimension.
///
/// Used for the complex's critical-point set.
pub type SimplexSet = FastHashSet<Simplex>;

/// Map from a simplex to the simplex it was reached from during one path search.
///
/// Scoped to a single search call and dropped afterwards, so no predecessor
/// state survives between searches.
pub type PredecessorMap = FastHashMap<Simplex, Simplex>;

/// Map from a simplex to an arbitrary per-simplex value.
pub type SimplexMap<V> = FastHashMap<Simplex, V>;
