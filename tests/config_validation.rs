//! Integration tests for configuration loading and validation

#![allow(clippy::expect_used, clippy::unwrap_used)]

use pgp_framing::config::{MAX_BODY_LENGTH, MIN_FIRST_PARTIAL_CHUNK};
use pgp_framing::{FramingConfig, IndeterminatePolicy, PacketError, PartialBodyPolicy};

#[test]
fn test_default_config_validates() {
    let config = FramingConfig::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
    assert_eq!(config.max_body_length, MAX_BODY_LENGTH);
    assert_eq!(config.partial_bodies, PartialBodyPolicy::Reassemble);
    assert_eq!(config.indeterminate, IndeterminatePolicy::Buffered);
}

#[test]
fn test_zero_body_length() {
    let config = FramingConfig::default_with_overrides(|c| c.max_body_length = 0);
    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("cannot be 0")));
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_body_length_beyond_wire_maximum() {
    let config = FramingConfig::default_with_overrides(|c| {
        c.max_body_length = u32::MAX as usize + 1;
    });
    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("too large")));
}

#[test]
fn test_limit_below_minimum_partial_chunk() {
    let small = MIN_FIRST_PARTIAL_CHUNK as usize - 1;
    let config = FramingConfig::default_with_overrides(|c| c.max_body_length = small);
    assert!(config
        .validate()
        .iter()
        .any(|e| e.contains("minimum partial chunk")));

    // irrelevant once partial bodies are rejected outright
    let config = FramingConfig::default_with_overrides(|c| {
        c.max_body_length = small;
        c.partial_bodies = PartialBodyPolicy::Reject;
    });
    assert!(config.validate().is_empty());
}

#[test]
fn test_validate_strict() {
    assert!(FramingConfig::default().validate_strict().is_ok());

    let config = FramingConfig::default_with_overrides(|c| c.max_body_length = 0);
    match config.validate_strict() {
        Err(PacketError::ConfigError(msg)) => assert!(msg.contains("validation failed")),
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn test_toml_with_missing_fields_uses_defaults() {
    let config = FramingConfig::from_toml("max_body_length = 4096").unwrap();
    assert_eq!(config.max_body_length, 4096);
    assert_eq!(config.partial_bodies, PartialBodyPolicy::Reassemble);

    let config = FramingConfig::from_toml(
        r#"
        partial_bodies = "reject"
        indeterminate = "until_eof"
        "#,
    )
    .unwrap();
    assert_eq!(config.max_body_length, MAX_BODY_LENGTH);
    assert_eq!(config.partial_bodies, PartialBodyPolicy::Reject);
    assert_eq!(config.indeterminate, IndeterminatePolicy::UntilEof);
}

#[test]
fn test_invalid_toml() {
    assert!(matches!(
        FramingConfig::from_toml("partial_bodies = \"sometimes\""),
        Err(PacketError::ConfigError(_))
    ));
    assert!(matches!(
        FramingConfig::from_toml("max_body_length = -1"),
        Err(PacketError::ConfigError(_))
    ));
}

#[test]
fn test_toml_roundtrip_through_file() {
    let config = FramingConfig::default_with_overrides(|c| {
        c.max_body_length = 1 << 20;
        c.indeterminate = IndeterminatePolicy::UntilEof;
    });
    let text = config.to_toml().unwrap();

    let path = std::env::temp_dir().join(format!("pgp-framing-{}.toml", std::process::id()));
    std::fs::write(&path, text).unwrap();
    let loaded = FramingConfig::from_file(&path);
    std::fs::remove_file(&path).ok();

    let loaded = loaded.unwrap();
    assert_eq!(loaded.max_body_length, 1 << 20);
    assert_eq!(loaded.partial_bodies, PartialBodyPolicy::Reassemble);
    assert_eq!(loaded.indeterminate, IndeterminatePolicy::UntilEof);
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        FramingConfig::from_file("/nonexistent/pgp-framing.toml"),
        Err(PacketError::ConfigError(_))
    ));
}

#[test]
fn test_policy_parsing() {
    assert_eq!("REJECT".parse::<PartialBodyPolicy>().unwrap(), PartialBodyPolicy::Reject);
    assert_eq!(
        "until_eof".parse::<IndeterminatePolicy>().unwrap(),
        IndeterminatePolicy::UntilEof
    );
    assert!("never".parse::<IndeterminatePolicy>().is_err());
}

#[test]
fn test_from_env() {
    std::env::set_var("PGP_FRAMING_MAX_BODY_LENGTH", "2048");
    std::env::set_var("PGP_FRAMING_PARTIAL_BODIES", "reject");
    let config = FramingConfig::from_env();
    std::env::set_var("PGP_FRAMING_MAX_BODY_LENGTH", "lots");
    let bad = FramingConfig::from_env();
    std::env::remove_var("PGP_FRAMING_MAX_BODY_LENGTH");
    std::env::remove_var("PGP_FRAMING_PARTIAL_BODIES");

    let config = config.unwrap();
    assert_eq!(config.max_body_length, 2048);
    assert_eq!(config.partial_bodies, PartialBodyPolicy::Reject);
    assert_eq!(config.indeterminate, IndeterminatePolicy::Buffered);
    assert!(matches!(bad, Err(PacketError::ConfigError(_))));
}
