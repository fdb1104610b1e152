//! Batch cancellation of persistence pairs.
//!
//! [`cancel_persistence_pairs`] sorts both pair sequences, then walks them in a
//! single merged ascending pass. Every pair whose persistence passes the
//! threshold test is analysed against the current gradient field; cancellable
//! pairs have their V-path reversed and both endpoints removed from the
//! critical set. Each attempt yields one [`CancellationRecord`], in attempt
//! order.

#![forbid(unsafe_code)]

use std::fmt;
use std::io::{self, Write};

use thiserror::Error;

use super::config::SimplificationConfig;
use super::reversal::{path_endpoints, reverse_v_path};
use super::vpath::{Cancellability, CancellabilityAnalyzer, Obstruction};
use crate::core::complex::SimplicialComplex;
use crate::core::gradient::{GradientField, GradientFieldError};
use crate::core::simplex::Simplex;
use crate::persistence::pairs::{PersistencePair, PersistencePairs};

// =============================================================================
// ERRORS
// =============================================================================

/// Errors that abort a cancellation pass.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CancellationError {
    /// An endpoint of a cancellable pair is not in the critical set.
    #[error("Cannot cancel: {simplex} is not critical")]
    NotCritical {
        /// The offending endpoint.
        simplex: Simplex,
    },
    /// The gradient field rejected the path reversal.
    #[error(transparent)]
    Gradient(#[from] GradientFieldError),
}

// =============================================================================
// RECORDS
// =============================================================================

/// What happened to one attempted pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttemptOutcome {
    /// Cancelled through a unique V-path.
    Cancelled,
    /// Cancelled through the equal-value shortcut.
    CancelledTrivially,
    /// Left in place.
    NotCancellable(Obstruction),
}

impl AttemptOutcome {
    /// Returns `true` if the pair was cancelled.
    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        !matches!(self, Self::NotCancellable(_))
    }
}

impl From<&Cancellability> for AttemptOutcome {
    fn from(outcome: &Cancellability) -> Self {
        match outcome {
            Cancellability::Trivial(_) => Self::CancelledTrivially,
            Cancellability::Unique(_) => Self::Cancelled,
            Cancellability::NotCancellable(reason) => Self::NotCancellable(*reason),
        }
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("Yes"),
            Self::CancelledTrivially => f.write_str("Yes (trivial)"),
            Self::NotCancellable(reason) => write!(f, "No, Reason: {reason}"),
        }
    }
}

/// One attempted cancellation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CancellationRecord {
    /// The pair.
    pub pair: PersistencePair,
    /// The result.
    pub outcome: AttemptOutcome,
}

impl fmt::Display for CancellationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pair {
            PersistencePair::MinSaddle(p) => write!(
                f,
                "Index: 01, Persistence: {} + {}e, Cancellable: {}",
                p.persistence, p.sym_perturb, self.outcome
            ),
            PersistencePair::SaddleMax(p) => write!(
                f,
                "Index: 12, Persistence: {} + {}e {}, Cancellable: {}",
                p.persistence, p.sym_perturb1, p.sym_perturb2, self.outcome
            ),
        }
    }
}

/// Summary of a cancellation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CancellationReport {
    records: Vec<CancellationRecord>,
    cancelled: usize,
    visited: usize,
}

impl CancellationReport {
    /// Attempts in the order they were made.
    #[must_use]
    pub fn records(&self) -> &[CancellationRecord] {
        &self.records
    }

    /// Number of pairs cancelled.
    #[must_use]
    pub const fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Number of pairs that passed the threshold test.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.records.len()
    }

    /// Number of pairs the scan passed over, attempted or not.
    #[must_use]
    pub const fn visited(&self) -> usize {
        self.visited
    }

    /// Writes one line per attempt.
    ///
    /// # Errors
    ///
    /// Propagates any I/O error from `out`.
    pub fn write_log<W: Write>(&self, mut out: W) -> io::Result<()> {
        for record in &self.records {
            writeln!(out, "{record}")?;
        }
        Ok(())
    }
}

// =============================================================================
// DRIVER
// =============================================================================

/// Sorts `pairs` and cancels every cancellable pair within the threshold.
///
/// The scan merges the two sorted sequences: the head vertex–edge pair goes
/// first when [`PairOrdering::min_saddle_first`](crate::persistence::ordering::PairOrdering::min_saddle_first)
/// says so. Once one sequence is exhausted the rest of the other is walked
/// with the same threshold test. No pair is visited twice.
///
/// # Errors
///
/// Returns a [`CancellationError`] if an endpoint of a cancellable pair is not
/// critical or the gradient field rejects the reversal. Cancellations made
/// before the error remain applied.
pub fn cancel_persistence_pairs(
    pairs: &mut PersistencePairs,
    complex: &mut SimplicialComplex,
    gradient: &mut GradientField,
    config: &SimplificationConfig,
) -> Result<CancellationReport, CancellationError> {
    let ordering = config.ordering;
    pairs.sort(ordering);

    let min_saddle = pairs.min_saddle();
    let saddle_max = pairs.saddle_max();
    let mut report = CancellationReport::default();
    let (mut i, mut j) = (0, 0);

    while i < min_saddle.len() || j < saddle_max.len() {
        let take_min_saddle = match (min_saddle.get(i), saddle_max.get(j)) {
            (Some(a), Some(b)) => ordering.min_saddle_first(
                (a.persistence, a.sym_perturb),
                (b.persistence, b.sym_perturb1),
            ),
            (Some(_), None) => true,
            (None, _) => false,
        };
        let pair = if take_min_saddle {
            i += 1;
            PersistencePair::MinSaddle(min_saddle[i - 1])
        } else {
            j += 1;
            PersistencePair::SaddleMax(saddle_max[j - 1])
        };

        report.visited += 1;
        if !ordering.within_threshold(pair.persistence(), config.persistence_threshold) {
            continue;
        }
        let outcome = attempt(&pair, complex, gradient, config)?;
        if outcome.is_cancelled() {
            report.cancelled += 1;
        }
        report.records.push(CancellationRecord { pair, outcome });
    }

    tracing::info!(
        visited = report.visited,
        attempted = report.attempted(),
        cancelled = report.cancelled,
        threshold = config.persistence_threshold,
        "cancellation pass finished"
    );
    Ok(report)
}

fn attempt(
    pair: &PersistencePair,
    complex: &mut SimplicialComplex,
    gradient: &mut GradientField,
    config: &SimplificationConfig,
) -> Result<AttemptOutcome, CancellationError> {
    let cancellability = CancellabilityAnalyzer::new(complex, gradient, config.ordering).analyze(pair);
    let outcome = AttemptOutcome::from(&cancellability);

    if let Some(path) = cancellability.path() {
        let (lower, higher) = path_endpoints(path).unwrap_or((pair.lower(), pair.higher()));
        debug_assert_eq!((lower, higher), (pair.lower(), pair.higher()));
        let endpoints = [lower, higher];
        if let Some(&simplex) = endpoints.iter().find(|&&s| !complex.is_critical(s)) {
            return Err(CancellationError::NotCritical { simplex });
        }
        reverse_v_path(gradient, path)?;
        for simplex in endpoints {
            complex.remove_critical(simplex);
        }
    }
    Ok(outcome)
}
