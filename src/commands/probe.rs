use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::browser::{Browser, BrowserType};
use crate::probe::{ProbeConfig, Prober};
use crate::report;
use crate::types::{ElementKind, OutputFormat, ProbeReport, ViewportSize};

#[allow(clippy::too_many_arguments)]
pub async fn handle_probe(
    url: String,
    fallback: Option<String>,
    kinds: Vec<ElementKind>,
    selector: Option<String>,
    output: String,
    format: OutputFormat,
    browser_name: String,
    no_headless: bool,
    viewport: Option<String>,
    settle_ms: u64,
    timeout_ms: u64,
    pause_ms: u64,
    max_elements: Option<usize>,
    require_effect: bool,
    probe_text: String,
) -> Result<()> {
    info!("Probing {}", url);

    validate_target(&url)?;
    if let Some(fb) = &fallback {
        validate_target(fb)?;
    }

    let browser_type: BrowserType = browser_name.parse()?;
    let viewport = viewport.as_deref().map(ViewportSize::parse).transpose()?;

    // Default policy: probe every kind
    let kinds = if kinds.is_empty() {
        vec![ElementKind::Button, ElementKind::Input, ElementKind::Link]
    } else {
        kinds
    };

    let browser = Browser::new(browser_type, viewport, !no_headless).await?;

    let settle = Duration::from_millis(settle_ms);
    let loaded = match browser
        .load_with_fallback(&url, fallback.as_deref(), settle)
        .await
    {
        Ok(loaded) => loaded,
        Err(e) => {
            // Navigation failure is fatal for the run, but a report is still
            // produced: zero elements, the error carried explicitly.
            let report = ProbeReport::navigation_failed(&url, &format!("{:#}", e));
            report::write_report(&report, Path::new(&output))?;
            emit(&report, format)?;
            let _ = browser.close().await;
            return Err(e);
        }
    };

    let config = ProbeConfig {
        interaction_timeout: Duration::from_millis(timeout_ms),
        interaction_pause: Duration::from_millis(pause_ms),
        probe_text,
        max_elements,
        require_observable_effect: require_effect,
        selector_override: selector,
    };

    let results = {
        let prober = Prober::new(&browser, config);
        prober.run(&kinds).await?
    };
    let page_errors = browser.page_errors().await.unwrap_or_default();

    let report = ProbeReport::new(&loaded, results, page_errors);
    report::write_report(&report, Path::new(&output))?;
    emit(&report, format)?;

    browser.close().await?;
    Ok(())
}

fn emit(report: &ProbeReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Simple => report::print_summary(report),
    }
    Ok(())
}

/// Reject malformed targets before a browser session is ever created
fn validate_target(target: &str) -> Result<()> {
    Url::parse(target).context(format!("Invalid target URL: {}", target))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_target_accepts_http_and_file_urls() {
        assert!(validate_target("https://example.com/app/").is_ok());
        assert!(validate_target("http://127.0.0.1:8080/index.html").is_ok());
        assert!(validate_target("file:///home/me/app/index.html").is_ok());
    }

    #[test]
    fn test_validate_target_rejects_malformed_urls() {
        assert!(validate_target("not a url").is_err());
        assert!(validate_target("/just/a/path").is_err());
        assert!(validate_target("").is_err());
    }
}
