/*!
 * Tests for application configuration
 */

use advox::app_config::Config;

#[test]
fn test_default_config_shouldValidate() {
    let config = Config::default();
    assert!(config.validate().is_ok());

    assert_eq!(config.frame_rate, 24.0);
    assert_eq!(config.extraction.y_line_threshold, 8.0);
    assert_eq!(config.extraction.anchor_pattern, r"^\d{4}$");
    assert_eq!(config.verify.minor_threshold_ms, 500);
    assert_eq!(config.synthesis.voice.speaker, "vdain");
}

#[test]
fn test_config_roundtrip_throughJson_shouldPreserveValues() {
    let mut config = Config::default();
    config.frame_rate = 23.976;
    config.extraction.y_line_threshold = 6.5;
    config.synthesis.concurrent_requests = 8;

    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.frame_rate, 23.976);
    assert_eq!(parsed.extraction.y_line_threshold, 6.5);
    assert_eq!(parsed.synthesis.concurrent_requests, 8);
}

#[test]
fn test_config_fromPartialJson_shouldFillDefaults() {
    // A sparse config file only overrides what it mentions
    let json = r#"{ "frame_rate": 30.0, "extraction": { "remove_periods": true } }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.frame_rate, 30.0);
    assert!(config.extraction.remove_periods);
    assert_eq!(config.extraction.y_line_threshold, 8.0);
    assert_eq!(config.synthesis.retry_count, 3);
}

#[test]
fn test_validate_withBadFrameRate_shouldFail() {
    let mut config = Config::default();
    config.frame_rate = 0.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withBadAnchorPattern_shouldFail() {
    let mut config = Config::default();
    config.extraction.anchor_pattern = "([unclosed".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withOutOfRangeVoice_shouldFail() {
    let mut config = Config::default();
    config.synthesis.voice.speed = 9;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroConcurrency_shouldFail() {
    let mut config = Config::default();
    config.synthesis.concurrent_requests = 0;
    assert!(config.validate().is_err());
}
