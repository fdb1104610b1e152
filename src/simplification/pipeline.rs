//! End-to-end simplification of a complex.
//!
//! ```rust
//! use discrete_morse::prelude::*;
//!
//! let mut complex = generate_random_grid_complex(6, 6, 3).unwrap();
//! let result = simplify(&mut complex, &SimplificationConfig::new(0.2)).unwrap();
//!
//! // Each cancellation removes two critical simplices.
//! assert_eq!(
//!     complex.critical_count(),
//!     complex.number_of_simplices() - 2 * result.report.cancelled()
//! );
//! assert!(validate_morse_counts(&complex).is_ok());
//! ```

#![forbid(unsafe_code)]

use thiserror::Error;

use super::cancellation::{CancellationError, CancellationReport, cancel_persistence_pairs};
use super::config::{SimplificationConfig, SimplificationConfigError};
use crate::core::complex::SimplicialComplex;
use crate::core::filtration::{Filtration, FiltrationError};
use crate::core::gradient::GradientField;
use crate::persistence::oracle::{OracleError, PersistenceOracle, TwistReduction};
use crate::persistence::pairs::{PairingError, PersistencePairs};

/// Errors from any stage of a simplification run.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SimplificationError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] SimplificationConfigError),
    /// The filtration could not be exported.
    #[error(transparent)]
    Filtration(#[from] FiltrationError),
    /// The oracle rejected the boundary matrix.
    #[error(transparent)]
    Oracle(#[from] OracleError),
    /// The oracle's pairing could not be typed.
    #[error(transparent)]
    Pairing(#[from] PairingError),
    /// The cancellation pass failed.
    #[error(transparent)]
    Cancellation(#[from] CancellationError),
}

/// Everything a run produces besides the updated critical set.
#[derive(Clone, Debug)]
pub struct Simplification {
    /// The filtration used.
    pub filtration: Filtration,
    /// The pairs, sorted under the configured ordering.
    pub pairs: PersistencePairs,
    /// The simplified gradient field.
    pub gradient: GradientField,
    /// Attempt log and counts.
    pub report: CancellationReport,
}

/// Simplifies `complex` with the default [`TwistReduction`] oracle.
///
/// # Errors
///
/// See [`simplify_with_oracle`].
pub fn simplify(
    complex: &mut SimplicialComplex,
    config: &SimplificationConfig,
) -> Result<Simplification, SimplificationError> {
    simplify_with_oracle(complex, config, &TwistReduction)
}

/// Simplifies `complex` using `oracle` for the persistence pairing.
///
/// Builds the filtration, pairs it, marks every simplex critical, starts
/// from an empty gradient field and runs the cancellation pass.
///
/// # Errors
///
/// Returns a [`SimplificationError`] from whichever stage failed.
pub fn simplify_with_oracle<O>(
    complex: &mut SimplicialComplex,
    config: &SimplificationConfig,
    oracle: &O,
) -> Result<Simplification, SimplificationError>
where
    O: PersistenceOracle + ?Sized,
{
    config.validate()?;

    let filtration = Filtration::build(complex);
    let matrix = filtration.boundary_matrix(complex)?;
    let pairing = oracle.compute_pairing(&matrix)?;
    let mut pairs = PersistencePairs::from_pairing(complex, &filtration, &pairing)?;
    tracing::info!(
        simplices = filtration.len(),
        min_saddle = pairs.min_saddle().len(),
        saddle_max = pairs.saddle_max().len(),
        essential = pairs.essential().len(),
        "computed persistence pairs"
    );

    let essential_sum: i64 = pairs
        .essential()
        .iter()
        .map(|s| if s.dim() == 1 { -1 } else { 1 })
        .sum();
    if essential_sum != complex.euler_characteristic() {
        tracing::warn!(
            essential_sum,
            euler = complex.euler_characteristic(),
            "essential classes do not match the Euler characteristic"
        );
    }

    complex.reset_critical_simplices();
    let mut gradient = GradientField::new();
    let report = cancel_persistence_pairs(&mut pairs, complex, &mut gradient, config)?;

    Ok(Simplification {
        filtration,
        pairs,
        gradient,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::ComplexBuilder;

    #[test]
    fn test_invalid_config_is_rejected_before_any_work() {
        let mut complex = ComplexBuilder::new(&[0.0, 1.0]).edge([0, 1]).build().unwrap();
        let err = simplify(&mut complex, &SimplificationConfig::new(f64::NAN)).unwrap_err();
        assert!(matches!(err, SimplificationError::Config(_)));
        assert_eq!(complex.critical_count(), 3);
    }

    #[test]
    fn test_empty_complex() {
        let mut complex = SimplicialComplex::new();
        let result = simplify(&mut complex, &SimplificationConfig::new(1.0)).unwrap();
        assert!(result.filtration.is_empty());
        assert!(result.pairs.is_empty());
        assert_eq!(result.report.cancelled(), 0);
    }

    #[test]
    fn test_single_edge_cancels_at_zero_threshold() {
        let mut complex = ComplexBuilder::new(&[0.0, 1.0]).edge([0, 1]).build().unwrap();
        let result = simplify(&mut complex, &SimplificationConfig::new(0.0)).unwrap();
        assert_eq!(result.report.cancelled(), 1);
        assert_eq!(complex.critical_count(), 1);
        assert_eq!(result.gradient.len(), 1);
    }
}
