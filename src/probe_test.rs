// Unit tests for the classification rules that don't need a browser

use super::*;
use crate::types::ProbeOutcome;
use pretty_assertions::assert_eq;

#[test]
fn test_precheck_passes_visible_enabled_elements() {
    assert!(precheck_outcome(true, true).is_none());
}

#[test]
fn test_precheck_rejects_hidden_even_when_enabled() {
    let (outcome, detail) = precheck_outcome(false, true).unwrap();
    assert_eq!(outcome, ProbeOutcome::NonFunctional);
    assert_eq!(detail.as_deref(), Some("not visible/enabled"));
}

#[test]
fn test_precheck_rejects_disabled_and_hidden_combinations() {
    for (visible, enabled) in [(true, false), (false, true), (false, false)] {
        let (outcome, _) = precheck_outcome(visible, enabled).unwrap();
        assert_eq!(outcome, ProbeOutcome::NonFunctional);
    }
}

#[test]
fn test_precheck_is_idempotent() {
    // Same static state, same classification, every time
    for _ in 0..2 {
        assert!(precheck_outcome(true, true).is_none());
        assert_eq!(
            precheck_outcome(false, true).unwrap().0,
            ProbeOutcome::NonFunctional
        );
    }
}

#[test]
fn test_readback_exact_match_is_functional() {
    let (outcome, detail) = readback_outcome("test input", Some("test input"));
    assert_eq!(outcome, ProbeOutcome::Functional);
    assert!(detail.is_none());
}

#[test]
fn test_readback_mismatch_is_non_functional() {
    // A masked/formatted field transformed the value
    let (outcome, detail) = readback_outcome("test input", Some("TEST INPUT"));
    assert_eq!(outcome, ProbeOutcome::NonFunctional);
    assert_eq!(detail.as_deref(), Some("value not set properly"));
}

#[test]
fn test_readback_missing_value_is_non_functional() {
    let (outcome, detail) = readback_outcome("test input", None);
    assert_eq!(outcome, ProbeOutcome::NonFunctional);
    assert_eq!(detail.as_deref(), Some("value not set properly"));
}

#[test]
fn test_config_defaults() {
    let config = ProbeConfig::default();
    assert_eq!(config.interaction_timeout, Duration::from_millis(1500));
    assert_eq!(config.interaction_pause, Duration::from_millis(500));
    assert_eq!(config.probe_text, "test input");
    assert!(config.max_elements.is_none());
    assert!(!config.require_observable_effect);
    assert!(config.selector_override.is_none());
}
