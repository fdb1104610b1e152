//! Reversing a V-path in the gradient field.

#![forbid(unsafe_code)]

use crate::core::gradient::{GradientField, GradientFieldError};
use crate::core::simplex::Simplex;

use super::vpath::VPath;

/// Reverses every pairing along `path`, which must come from a
/// [`CancellabilityAnalyzer`](super::vpath::CancellabilityAnalyzer) run
/// against the current state of `gradient`.
///
/// For every lower-dimensional simplex at index `i`, the pair with
/// `path[i + 1]` is removed and a pair with `path[i - 1]` is added. Both
/// endpoints of the path end up matched.
///
/// The path is checked before anything changes: either the whole path is
/// reversed or `gradient` is left untouched.
///
/// # Errors
///
/// Returns [`GradientFieldError::AlreadyMatched`] if an endpoint is already
/// matched, or [`GradientFieldError::PairNotFound`] if an interior pair of the
/// path is not in the field (for instance when the path is stale).
///
/// # Examples
///
/// ```rust
/// use discrete_morse::core::builder::ComplexBuilder;
/// use discrete_morse::core::gradient::GradientField;
/// use discrete_morse::core::simplex::Simplex;
/// use discrete_morse::simplification::reversal::reverse_v_path;
/// use discrete_morse::simplification::vpath::VPath;
///
/// let complex = ComplexBuilder::new(&[0.0, 1.0]).edge([0, 1]).build().unwrap();
/// let (v, _) = complex.vertices().nth(1).unwrap();
/// let (e, _) = complex.edges().next().unwrap();
///
/// let mut gradient = GradientField::new();
/// let path = VPath::new(vec![Simplex::Edge(e), Simplex::Vertex(v)]);
/// reverse_v_path(&mut gradient, &path).unwrap();
/// assert_eq!(gradient.vertex_of_edge(e), Some(v));
///
/// // Reversing the same path again is rejected.
/// assert!(reverse_v_path(&mut gradient, &path).is_err());
/// ```
pub fn reverse_v_path(gradient: &mut GradientField, path: &VPath) -> Result<(), GradientFieldError> {
    let simplices = path.as_slice();
    let (Some(&first), Some(&last)) = (simplices.first(), simplices.last()) else {
        return Ok(());
    };
    let lower_dim = first.dim().saturating_sub(1);

    for endpoint in [first, last] {
        if gradient.is_matched(endpoint) {
            let (lower, higher) = (last, first);
            return Err(GradientFieldError::AlreadyMatched {
                lower,
                higher,
                matched: endpoint,
            });
        }
    }
    for (i, window) in simplices.windows(2).enumerate() {
        let (current, next) = (window[0], window[1]);
        if current.dim() == lower_dim && gradient.partner(current) != Some(next) {
            return Err(GradientFieldError::PairNotFound {
                lower: current,
                higher: next,
            });
        }
        if current.dim() != lower_dim && next.dim() != lower_dim {
            return Err(GradientFieldError::PairNotFound {
                lower: simplices[i + 1],
                higher: current,
            });
        }
    }

    for (i, &simplex) in simplices.iter().enumerate() {
        if simplex.dim() != lower_dim {
            continue;
        }
        if let Some(&next) = simplices.get(i + 1) {
            gradient.remove_pair(simplex, next)?;
        }
        if let Some(prev) = i.checked_sub(1).map(|j| simplices[j]) {
            gradient.add_pair(simplex, prev)?;
        }
    }
    Ok(())
}

/// The two endpoints of a path, lower-dimensional first.
#[must_use]
pub fn path_endpoints(path: &VPath) -> Option<(Simplex, Simplex)> {
    Some((path.last()?, path.first()?))
}
