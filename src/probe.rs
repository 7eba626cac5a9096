use fantoccini::elements::Element;
use std::time::Duration;
use tracing::{debug, info};

use anyhow::Result;

use crate::browser::Browser;
use crate::types::{ElementKind, ElementProbeResult, ProbeOutcome};

/// Tunables for a probe run
#[derive(Clone, Debug)]
pub struct ProbeConfig {
    /// Upper bound on a single interaction attempt
    pub interaction_timeout: Duration,
    /// Pause after each interaction attempt so async page effects settle
    /// before the next element is probed
    pub interaction_pause: Duration,
    /// Fixed value written into inputs for the fill-then-read-back check
    pub probe_text: String,
    /// Probe at most this many elements per kind; the rest are recorded as
    /// skipped
    pub max_elements: Option<usize>,
    /// Stricter click policy: require the page URL or element count to change
    /// before calling a click functional
    pub require_observable_effect: bool,
    /// Override the kind's default CSS selector
    pub selector_override: Option<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            interaction_timeout: Duration::from_millis(1500),
            interaction_pause: Duration::from_millis(500),
            probe_text: "test input".to_string(),
            max_elements: None,
            require_observable_effect: false,
            selector_override: None,
        }
    }
}

/// Discovers interactive elements on a loaded page, exercises each one, and
/// classifies the outcome.
///
/// The page handle is borrowed for the duration of the run; the prober never
/// closes it or navigates it away itself (though a probed click may).
pub struct Prober<'a> {
    browser: &'a Browser,
    config: ProbeConfig,
}

impl<'a> Prober<'a> {
    pub fn new(browser: &'a Browser, config: ProbeConfig) -> Self {
        Prober { browser, config }
    }

    /// Probe each requested kind in order, strictly sequentially.
    ///
    /// Discovery happens once per kind, when that kind's pass starts; the
    /// discovered set is fixed for the pass. Elements added or removed by
    /// earlier interactions are not re-queried, only observed as side effects
    /// on later already-discovered elements.
    pub async fn run(&self, kinds: &[ElementKind]) -> Result<Vec<ElementProbeResult>> {
        let mut results = Vec::new();
        for kind in kinds {
            self.probe_kind(*kind, &mut results).await?;
        }
        Ok(results)
    }

    async fn probe_kind(
        &self,
        kind: ElementKind,
        results: &mut Vec<ElementProbeResult>,
    ) -> Result<()> {
        let selector = self
            .config
            .selector_override
            .as_deref()
            .unwrap_or_else(|| kind.selector());

        let elements = self.browser.find_elements(selector).await?;
        info!("Found {} {:?} element(s) to probe", elements.len(), kind);

        for (index, element) in elements.iter().enumerate() {
            if let Some(cap) = self.config.max_elements
                && index >= cap
            {
                results.push(self.skip_element(kind, index, element).await);
                continue;
            }

            let result = self.probe_element(kind, index, element).await;
            info!(
                "{:?} \"{}\": {:?}{}",
                kind,
                result.label,
                result.outcome,
                result
                    .error_detail
                    .as_deref()
                    .map(|d| format!(" ({})", d))
                    .unwrap_or_default()
            );
            results.push(result);
        }

        Ok(())
    }

    /// Classify one element: property read, visibility/enabled precheck, then
    /// the canonical interaction for its kind. Every failure is converted into
    /// classification data here; nothing at this boundary aborts the run.
    async fn probe_element(
        &self,
        kind: ElementKind,
        index: usize,
        element: &Element,
    ) -> ElementProbeResult {
        let (label, visible, enabled) = match self.read_properties(element, index).await {
            Ok(props) => props,
            Err(e) => {
                return ElementProbeResult {
                    kind,
                    index,
                    label: format!("Element {}", index),
                    visible: false,
                    enabled: false,
                    outcome: ProbeOutcome::NonFunctional,
                    error_detail: Some(format!("property read failed: {}", e)),
                };
            }
        };

        if let Some((outcome, error_detail)) = precheck_outcome(visible, enabled) {
            debug!("Skipping interaction with \"{}\": hidden or disabled", label);
            return ElementProbeResult {
                kind,
                index,
                label,
                visible,
                enabled,
                outcome,
                error_detail,
            };
        }

        let (outcome, error_detail) = if kind.is_fill() {
            self.probe_fill(element).await
        } else {
            self.probe_click(kind, element).await
        };

        ElementProbeResult {
            kind,
            index,
            label,
            visible,
            enabled,
            outcome,
            error_detail,
        }
    }

    /// Best-effort label plus the two interaction gates. Any read error is a
    /// property read failure for the whole element.
    async fn read_properties(
        &self,
        element: &Element,
        index: usize,
    ) -> Result<(String, bool, bool)> {
        let text = element.text().await?;
        let mut label = text.trim().to_string();
        if label.is_empty()
            && let Some(placeholder) = element.attr("placeholder").await?
        {
            label = placeholder.trim().to_string();
        }
        if label.is_empty()
            && let Some(aria) = element.attr("aria-label").await?
        {
            label = aria.trim().to_string();
        }
        if label.is_empty() {
            label = format!("Element {}", index);
        }

        let visible = element.is_displayed().await?;
        let enabled = element.is_enabled().await?;

        Ok((label, visible, enabled))
    }

    async fn probe_click(
        &self,
        kind: ElementKind,
        element: &Element,
    ) -> (ProbeOutcome, Option<String>) {
        // A link with an absolute href is counted functional without clicking,
        // so the run does not navigate away to an external site.
        if kind == ElementKind::Link
            && let Ok(Some(href)) = element.attr("href").await
            && href.starts_with("http")
        {
            return (ProbeOutcome::Functional, None);
        }

        let before = if self.config.require_observable_effect {
            self.browser.page_fingerprint().await.ok()
        } else {
            None
        };

        let timeout = self.config.interaction_timeout;
        let attempt = tokio::time::timeout(timeout, element.click()).await;

        // Yield so asynchronous page effects settle before the next element
        tokio::time::sleep(self.config.interaction_pause).await;

        match attempt {
            Err(_) => (
                ProbeOutcome::NonFunctional,
                Some(format!(
                    "interaction timed out after {}ms",
                    timeout.as_millis()
                )),
            ),
            Ok(Err(e)) => (
                ProbeOutcome::NonFunctional,
                Some(format!("click failed: {}", e)),
            ),
            Ok(Ok(())) => {
                if let Some(before) = before {
                    match self.browser.page_fingerprint().await {
                        Ok(after) if after == before => (
                            ProbeOutcome::NonFunctional,
                            Some("no observable effect".to_string()),
                        ),
                        Ok(_) => (ProbeOutcome::Functional, None),
                        Err(e) => (
                            ProbeOutcome::NonFunctional,
                            Some(format!("effect check failed: {}", e)),
                        ),
                    }
                } else {
                    (ProbeOutcome::Functional, None)
                }
            }
        }
    }

    async fn probe_fill(&self, element: &Element) -> (ProbeOutcome, Option<String>) {
        let timeout = self.config.interaction_timeout;
        let probe_text = self.config.probe_text.as_str();

        let fill = async {
            element.clear().await?;
            element.send_keys(probe_text).await?;
            element.prop("value").await
        };
        let attempt = tokio::time::timeout(timeout, fill).await;

        let (outcome, error_detail) = match attempt {
            Err(_) => (
                ProbeOutcome::NonFunctional,
                Some(format!(
                    "interaction timed out after {}ms",
                    timeout.as_millis()
                )),
            ),
            Ok(Err(e)) => (
                ProbeOutcome::NonFunctional,
                Some(format!("fill failed: {}", e)),
            ),
            Ok(Ok(value)) => readback_outcome(probe_text, value.as_deref()),
        };

        // Clear the field on every exit path so later probes are not polluted
        let _ = tokio::time::timeout(timeout, element.clear()).await;

        tokio::time::sleep(self.config.interaction_pause).await;

        (outcome, error_detail)
    }

    /// Record an element past the cap as discovered but never exercised
    async fn skip_element(
        &self,
        kind: ElementKind,
        index: usize,
        element: &Element,
    ) -> ElementProbeResult {
        let label = element
            .text()
            .await
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("Element {}", index));

        ElementProbeResult {
            kind,
            index,
            label,
            visible: element.is_displayed().await.unwrap_or(false),
            enabled: element.is_enabled().await.unwrap_or(false),
            outcome: ProbeOutcome::Skipped,
            error_detail: Some("element cap reached".to_string()),
        }
    }
}

/// Hidden or disabled elements are classified without an interaction attempt
fn precheck_outcome(visible: bool, enabled: bool) -> Option<(ProbeOutcome, Option<String>)> {
    if visible && enabled {
        None
    } else {
        Some((
            ProbeOutcome::NonFunctional,
            Some("not visible/enabled".to_string()),
        ))
    }
}

/// A fill is functional only when the read-back value exactly equals what was
/// written
fn readback_outcome(expected: &str, actual: Option<&str>) -> (ProbeOutcome, Option<String>) {
    if actual == Some(expected) {
        (ProbeOutcome::Functional, None)
    } else {
        (
            ProbeOutcome::NonFunctional,
            Some("value not set properly".to_string()),
        )
    }
}

#[cfg(test)]
#[path = "probe_test.rs"]
mod probe_test;
