//! Simplification settings.
//!
//! [`SimplificationConfig`] carries the persistence threshold δ and the
//! [`PairOrdering`] mode. It can be built with [`SimplificationConfigBuilder`]
//! (validated), with [`SimplificationConfig::new`], or deserialized with serde.
//!
//! # Examples
//!
//! ```rust
//! use discrete_morse::persistence::ordering::PairOrdering;
//! use discrete_morse::simplification::config::{
//!     SimplificationConfigBuilder, SimplificationConfigError,
//! };
//!
//! let config = SimplificationConfigBuilder::default()
//!     .persistence_threshold(0.25)
//!     .ordering(PairOrdering::Exact)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.persistence_threshold, 0.25);
//!
//! let err = SimplificationConfigBuilder::default()
//!     .persistence_threshold(-1.0)
//!     .build()
//!     .unwrap_err();
//! assert!(matches!(err, SimplificationConfigError::InvalidThreshold { .. }));
//! ```

#![forbid(unsafe_code)]

use derive_builder::{Builder, UninitializedFieldError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::ordering::PairOrdering;

/// Errors raised for an invalid configuration.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SimplificationConfigError {
    /// δ must be finite and non-negative.
    #[error("Persistence threshold must be finite and non-negative, got {value}")]
    InvalidThreshold {
        /// The rejected threshold.
        value: f64,
    },
    /// A required builder field was not set.
    #[error("Missing configuration field: {field}")]
    MissingField {
        /// The field name.
        field: &'static str,
    },
}

impl From<UninitializedFieldError> for SimplificationConfigError {
    fn from(err: UninitializedFieldError) -> Self {
        Self::MissingField {
            field: err.field_name(),
        }
    }
}

/// Settings for a simplification run.
#[derive(Builder, Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate", error = "SimplificationConfigError"))]
pub struct SimplificationConfig {
    /// Pairs with persistence up to δ are cancelled when possible.
    #[builder(default)]
    #[serde(default)]
    pub persistence_threshold: f64,
    /// Comparison mode for sorting and threshold tests.
    #[builder(default)]
    #[serde(default)]
    pub ordering: PairOrdering,
}

impl SimplificationConfig {
    /// Tolerant ordering with threshold δ.
    #[must_use]
    pub const fn new(persistence_threshold: f64) -> Self {
        Self {
            persistence_threshold,
            ordering: PairOrdering::Tolerant,
        }
    }

    /// Checks the threshold; deserialized values bypass the builder.
    ///
    /// # Errors
    ///
    /// Returns [`SimplificationConfigError::InvalidThreshold`] for a negative
    /// or non-finite threshold.
    pub fn validate(&self) -> Result<(), SimplificationConfigError> {
        check_threshold(self.persistence_threshold)
    }
}

impl SimplificationConfigBuilder {
    fn validate(&self) -> Result<(), SimplificationConfigError> {
        self.persistence_threshold.map_or(Ok(()), check_threshold)
    }
}

fn check_threshold(value: f64) -> Result<(), SimplificationConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimplificationConfigError::InvalidThreshold { value })
    }
}
