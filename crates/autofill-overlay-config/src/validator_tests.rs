use super::*;

#[test]
fn test_validate_default_config() {
    let config = OverlayConfig::default();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_zero_depth() {
    let mut config = OverlayConfig::default();
    config.sub_frame.max_depth = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "sub_frame.max_depth"));
}

#[test]
fn test_validate_high_depth_warning() {
    let mut config = OverlayConfig::default();
    config.sub_frame.max_depth = 64;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "sub_frame.max_depth"));
}

#[test]
fn test_validate_zero_thresholds() {
    let mut config = OverlayConfig::default();
    config.sentinel.max_observer_iterations = 0;
    config.sentinel.max_foreign_mutations = 0;

    let result = ConfigValidator::validate(&config);
    assert_eq!(result.errors.len(), 2);
}

#[test]
fn test_validate_zero_delay() {
    let mut config = OverlayConfig::default();
    config.timing.delayed_closure_ms = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "timing.delayed_closure_ms"));
}

#[test]
fn test_validate_long_window_warning() {
    let mut config = OverlayConfig::default();
    config.sentinel.counter_reset_ms = 60_000;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "sentinel.counter_reset_ms"));
}

#[test]
fn test_validate_empty_menu_path() {
    let mut config = OverlayConfig::default();
    config.iframe.menu_path = "  ".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "iframe.menu_path"));
}

#[test]
fn test_validate_filter_directive_level_warning() {
    let mut config = OverlayConfig::default();
    config.logging.level = "autofill_overlay_core=debug".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_into_result() {
    let mut config = OverlayConfig::default();
    config.sub_frame.max_depth = 0;
    let err = ConfigValidator::validate(&config).into_result().unwrap_err();
    assert!(err.to_string().contains("sub_frame.max_depth"));

    let warnings = ConfigValidator::validate(&OverlayConfig::default())
        .into_result()
        .unwrap();
    assert!(warnings.is_empty());
}
