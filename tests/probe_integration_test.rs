// End-to-end probe runs against the local test server.
//
// These tests need a WebDriver (chromedriver or geckodriver) on PATH; when
// none can be started they skip themselves. They run serially because the
// drivers do not tolerate concurrent session creation.

use serial_test::serial;
use std::time::Duration;

use pageprobe::probe::{ProbeConfig, Prober};
use pageprobe::types::{ElementKind, ProbeOutcome, ProbeReport};

#[path = "test_utils.rs"]
mod test_utils;

fn fast_config() -> ProbeConfig {
    ProbeConfig {
        interaction_timeout: Duration::from_millis(1500),
        interaction_pause: Duration::from_millis(100),
        ..ProbeConfig::default()
    }
}

#[tokio::test]
#[serial]
async fn test_buttons_page_counts() {
    let Some(browser) = test_utils::get_test_browser_with_retry().await else {
        eprintln!("Skipping: no WebDriver available");
        return;
    };
    let base = test_utils::spawn_test_server().await;

    browser
        .load_with_fallback(&format!("{}/buttons", base), None, Duration::from_millis(200))
        .await
        .expect("failed to load buttons page");

    let results = {
        let prober = Prober::new(&browser, fast_config());
        prober
            .run(&[ElementKind::Button])
            .await
            .expect("probe run failed")
    };
    let report = ProbeReport::new(&format!("{}/buttons", base), results, vec![]);

    // One working, one disabled, one hidden
    assert_eq!(report.summary.total_elements, 3);
    assert_eq!(report.summary.functional_count, 1);
    assert_eq!(report.summary.non_functional_count, 2);
    assert_eq!(report.summary.functionality_rate, 33.3);
    assert_eq!(
        report.summary.total_elements,
        report.summary.functional_count + report.summary.non_functional_count
    );

    // The disabled and hidden buttons were rejected without interaction
    for element in &report.results {
        if element.outcome == ProbeOutcome::NonFunctional {
            assert_eq!(element.error_detail.as_deref(), Some("not visible/enabled"));
        }
    }

    let _ = browser.close().await;
}

#[tokio::test]
#[serial]
async fn test_single_input_round_trip() {
    let Some(browser) = test_utils::get_test_browser_with_retry().await else {
        eprintln!("Skipping: no WebDriver available");
        return;
    };
    let base = test_utils::spawn_test_server().await;

    browser
        .load_with_fallback(&format!("{}/input", base), None, Duration::from_millis(200))
        .await
        .expect("failed to load input page");

    let results = {
        let prober = Prober::new(&browser, fast_config());
        prober
            .run(&[ElementKind::Input])
            .await
            .expect("probe run failed")
    };
    let report = ProbeReport::new(&format!("{}/input", base), results, vec![]);

    assert_eq!(report.summary.functional_count, 1);
    assert_eq!(report.summary.non_functional_count, 0);
    // Label falls back to the placeholder for inputs with no text content
    assert_eq!(report.results[0].label, "Ask me anything");

    let _ = browser.close().await;
}

#[tokio::test]
#[serial]
async fn test_formatted_input_fails_readback() {
    let Some(browser) = test_utils::get_test_browser_with_retry().await else {
        eprintln!("Skipping: no WebDriver available");
        return;
    };
    let base = test_utils::spawn_test_server().await;

    browser
        .load_with_fallback(&format!("{}/inputs", base), None, Duration::from_millis(200))
        .await
        .expect("failed to load inputs page");

    let results = {
        let prober = Prober::new(&browser, fast_config());
        prober
            .run(&[ElementKind::Input])
            .await
            .expect("probe run failed")
    };

    assert_eq!(results.len(), 2);

    let plain = &results[0];
    assert_eq!(plain.outcome, ProbeOutcome::Functional);

    // The formatting field rewrites the value, so read-back differs
    let formatted = &results[1];
    assert_eq!(formatted.outcome, ProbeOutcome::NonFunctional);
    assert_eq!(
        formatted.error_detail.as_deref(),
        Some("value not set properly")
    );

    let _ = browser.close().await;
}

#[tokio::test]
#[serial]
async fn test_removed_element_becomes_property_read_failure() {
    let Some(browser) = test_utils::get_test_browser_with_retry().await else {
        eprintln!("Skipping: no WebDriver available");
        return;
    };
    let base = test_utils::spawn_test_server().await;

    browser
        .load_with_fallback(
            &format!("{}/removal", base),
            None,
            Duration::from_millis(200),
        )
        .await
        .expect("failed to load removal page");

    let results = {
        let prober = Prober::new(&browser, fast_config());
        prober
            .run(&[ElementKind::Button])
            .await
            .expect("probe run failed")
    };

    assert_eq!(results.len(), 2);

    // The first click succeeds and removes the second button
    assert_eq!(results[0].outcome, ProbeOutcome::Functional);

    // The second element's handle is stale by the time it is probed; the run
    // records the failure instead of aborting
    let removed = &results[1];
    assert_eq!(removed.outcome, ProbeOutcome::NonFunctional);
    assert!(
        removed
            .error_detail
            .as_deref()
            .unwrap_or_default()
            .starts_with("property read failed"),
        "unexpected detail: {:?}",
        removed.error_detail
    );

    let _ = browser.close().await;
}

#[tokio::test]
#[serial]
async fn test_blocking_handler_times_out() {
    let Some(browser) = test_utils::get_test_browser_with_retry().await else {
        eprintln!("Skipping: no WebDriver available");
        return;
    };
    let base = test_utils::spawn_test_server().await;

    browser
        .load_with_fallback(&format!("{}/slow", base), None, Duration::from_millis(200))
        .await
        .expect("failed to load slow page");

    // The page's handler busy-waits for 2500ms, comfortably past this bound
    let config = ProbeConfig {
        interaction_timeout: Duration::from_millis(800),
        ..fast_config()
    };
    let results = {
        let prober = Prober::new(&browser, config);
        prober
            .run(&[ElementKind::Button])
            .await
            .expect("probe run failed")
    };

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].outcome, ProbeOutcome::NonFunctional);
    assert_eq!(
        results[0].error_detail.as_deref(),
        Some("interaction timed out after 800ms")
    );

    let _ = browser.close().await;
}

#[tokio::test]
#[serial]
async fn test_empty_page_yields_defined_rate() {
    let Some(browser) = test_utils::get_test_browser_with_retry().await else {
        eprintln!("Skipping: no WebDriver available");
        return;
    };
    let base = test_utils::spawn_test_server().await;

    browser
        .load_with_fallback(&format!("{}/empty", base), None, Duration::from_millis(200))
        .await
        .expect("failed to load empty page");

    let results = {
        let prober = Prober::new(&browser, fast_config());
        prober
            .run(&[ElementKind::Button])
            .await
            .expect("probe run failed")
    };
    let report = ProbeReport::new(&format!("{}/empty", base), results, vec![]);

    assert_eq!(report.summary.total_elements, 0);
    assert_eq!(report.summary.functionality_rate, 0.0);
    assert!(report.summary.functionality_rate.is_finite());

    let _ = browser.close().await;
}

#[tokio::test]
#[serial]
async fn test_link_policies() {
    let Some(browser) = test_utils::get_test_browser_with_retry().await else {
        eprintln!("Skipping: no WebDriver available");
        return;
    };
    let base = test_utils::spawn_test_server().await;

    browser
        .load_with_fallback(&format!("{}/links", base), None, Duration::from_millis(200))
        .await
        .expect("failed to load links page");

    let results = {
        let prober = Prober::new(&browser, fast_config());
        prober
            .run(&[ElementKind::Link])
            .await
            .expect("probe run failed")
    };

    // External link, role=button chip, internal link
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.outcome == ProbeOutcome::Functional));

    let _ = browser.close().await;
}

#[tokio::test]
#[serial]
async fn test_static_page_classification_is_repeatable() {
    let Some(browser) = test_utils::get_test_browser_with_retry().await else {
        eprintln!("Skipping: no WebDriver available");
        return;
    };
    let base = test_utils::spawn_test_server().await;
    let url = format!("{}/buttons", base);

    let mut outcome_runs = Vec::new();
    for _ in 0..2 {
        browser
            .load_with_fallback(&url, None, Duration::from_millis(200))
            .await
            .expect("failed to load buttons page");

        let results = {
            let prober = Prober::new(&browser, fast_config());
            prober
                .run(&[ElementKind::Button])
                .await
                .expect("probe run failed")
        };
        outcome_runs.push(results.iter().map(|r| r.outcome).collect::<Vec<_>>());
    }

    assert_eq!(outcome_runs[0], outcome_runs[1]);

    let _ = browser.close().await;
}

#[tokio::test]
#[serial]
async fn test_element_cap_marks_remainder_skipped() {
    let Some(browser) = test_utils::get_test_browser_with_retry().await else {
        eprintln!("Skipping: no WebDriver available");
        return;
    };
    let base = test_utils::spawn_test_server().await;

    browser
        .load_with_fallback(&format!("{}/buttons", base), None, Duration::from_millis(200))
        .await
        .expect("failed to load buttons page");

    let config = ProbeConfig {
        max_elements: Some(1),
        ..fast_config()
    };
    let results = {
        let prober = Prober::new(&browser, config);
        prober
            .run(&[ElementKind::Button])
            .await
            .expect("probe run failed")
    };
    let report = ProbeReport::new(&format!("{}/buttons", base), results, vec![]);

    assert_eq!(report.summary.total_elements, 3);
    assert_eq!(report.summary.skipped_count, 2);
    assert_eq!(
        report.summary.total_elements,
        report.summary.functional_count
            + report.summary.non_functional_count
            + report.summary.skipped_count
    );

    let _ = browser.close().await;
}

#[tokio::test]
#[serial]
async fn test_navigation_failure_after_fallback_is_fatal() {
    let Some(browser) = test_utils::get_test_browser_with_retry().await else {
        eprintln!("Skipping: no WebDriver available");
        return;
    };

    let result = browser
        .load_with_fallback(
            "http://127.0.0.1:1/unreachable",
            Some("http://127.0.0.1:1/also-unreachable"),
            Duration::from_millis(100),
        )
        .await;

    assert!(result.is_err());

    let _ = browser.close().await;
}
