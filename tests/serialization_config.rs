//! Reading simplification settings from JSON.

#![forbid(unsafe_code)]

use discrete_morse::prelude::*;

#[test]
fn test_config_file_drives_simplification() {
    let text = r#"{ "persistence_threshold": 1.0, "ordering": "tolerant" }"#;
    let config: SimplificationConfig = serde_json::from_str(text).unwrap();
    assert_eq!(config, SimplificationConfig::new(1.0));

    let mut complex = ComplexBuilder::new(&[0.0, 2.0, 1.0])
        .edge([0, 1])
        .edge([1, 2])
        .build()
        .unwrap();
    let result = simplify(&mut complex, &config).unwrap();
    assert_eq!(result.report.cancelled(), 2);
}

#[test]
fn test_missing_fields_use_defaults() {
    let config: SimplificationConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, SimplificationConfig::default());
    assert_eq!(config.persistence_threshold, 0.0);
}

#[test]
fn test_unknown_ordering_is_rejected() {
    let result: Result<SimplificationConfig, _> =
        serde_json::from_str(r#"{ "ordering": "fuzzy" }"#);
    assert!(result.is_err());
}

#[test]
fn test_deserialized_negative_threshold_fails_at_run_time() {
    let config: SimplificationConfig =
        serde_json::from_str(r#"{ "persistence_threshold": -0.5 }"#).unwrap();
    let mut complex = generate_random_grid_complex(3, 3, 5).unwrap();
    let err = simplify(&mut complex, &config).unwrap_err();
    assert_eq!(
        err,
        SimplificationError::Config(SimplificationConfigError::InvalidThreshold { value: -0.5 })
    );
    assert_eq!(
        err.to_string(),
        "Persistence threshold must be finite and non-negative, got -0.5"
    );
}

#[test]
fn test_order_key_serializes() {
    let key = OrderKey {
        value: 1.5,
        perturbation: Perturbation::Pair(1.0, 0.25),
    };
    let json = serde_json::to_string(&key).unwrap();
    let back: OrderKey = serde_json::from_str(&json).unwrap();
    assert_eq!(back.cmp_total(&key), std::cmp::Ordering::Equal);
}
