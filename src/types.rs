use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Terminal classification for a probed element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProbeOutcome {
    /// The canonical interaction completed without raising
    Functional,
    /// Hidden, disabled, errored, timed out, or failed read-back
    NonFunctional,
    /// Discovered but never exercised (element cap reached)
    Skipped,
}

/// The class of interactive element a probe run targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// `<button>` elements, probed by clicking
    Button,
    /// `<input>` and `<textarea>` elements, probed by fill-then-read-back
    Input,
    /// `<a>` and `[role="button"]` elements, probed by clicking
    Link,
}

impl ElementKind {
    /// Default CSS selector policy for this kind
    pub fn selector(&self) -> &'static str {
        match self {
            ElementKind::Button => "button",
            ElementKind::Input => "input, textarea",
            ElementKind::Link => r#"a, [role="button"]"#,
        }
    }

    /// Whether the canonical interaction is fill-then-read-back (vs click)
    pub fn is_fill(&self) -> bool {
        matches!(self, ElementKind::Input)
    }
}

/// Classification record for one discovered element
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementProbeResult {
    /// Element kind this result belongs to
    pub kind: ElementKind,
    /// Ordinal position within discovery order for its kind (0-based)
    pub index: usize,
    /// Best-effort human-readable text for the element
    pub label: String,
    /// Element was rendered and occupied layout space at probe time
    pub visible: bool,
    /// Element accepted interaction (not disabled) at probe time
    pub enabled: bool,
    /// Terminal classification
    pub outcome: ProbeOutcome,
    /// Diagnostic detail, present when the attempt raised or was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

/// Aggregate counts over a probe run, computed by a single fold over results
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeSummary {
    pub total_elements: usize,
    pub visible_count: usize,
    pub enabled_count: usize,
    pub functional_count: usize,
    pub non_functional_count: usize,
    pub skipped_count: usize,
    /// `functional / total` as a percentage, one decimal, 0.0 for empty runs
    pub functionality_rate: f64,
}

impl ProbeSummary {
    /// Reduce a result sequence into aggregate counts.
    ///
    /// Division is zero-guarded: an empty run reports a rate of 0.0,
    /// never NaN or infinity.
    pub fn from_results(results: &[ElementProbeResult]) -> Self {
        let total_elements = results.len();
        let visible_count = results.iter().filter(|r| r.visible).count();
        let enabled_count = results.iter().filter(|r| r.enabled).count();
        let functional_count = results
            .iter()
            .filter(|r| r.outcome == ProbeOutcome::Functional)
            .count();
        let non_functional_count = results
            .iter()
            .filter(|r| r.outcome == ProbeOutcome::NonFunctional)
            .count();
        let skipped_count = results
            .iter()
            .filter(|r| r.outcome == ProbeOutcome::Skipped)
            .count();

        let functionality_rate = if total_elements == 0 {
            0.0
        } else {
            let pct = functional_count as f64 / total_elements as f64 * 100.0;
            (pct * 10.0).round() / 10.0
        };

        ProbeSummary {
            total_elements,
            visible_count,
            enabled_count,
            functional_count,
            non_functional_count,
            skipped_count,
            functionality_rate,
        }
    }
}

/// Complete report for one probe run: summary plus the ordered element list
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    /// The target that was actually loaded (or attempted)
    pub target: String,
    /// RFC3339 timestamp of report creation
    pub generated_at: String,
    pub summary: ProbeSummary,
    /// Set when neither the primary nor the fallback target could be loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_error: Option<String>,
    /// Console error messages observed on the page during the run
    pub page_errors: Vec<String>,
    /// Per-element results in discovery order
    pub results: Vec<ElementProbeResult>,
}

impl ProbeReport {
    pub fn new(target: &str, results: Vec<ElementProbeResult>, page_errors: Vec<String>) -> Self {
        ProbeReport {
            target: target.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary: ProbeSummary::from_results(&results),
            navigation_error: None,
            page_errors,
            results,
        }
    }

    /// Report for a run abandoned before discovery: zero elements probed,
    /// the navigation error carried explicitly.
    pub fn navigation_failed(target: &str, error: &str) -> Self {
        ProbeReport {
            target: target.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary: ProbeSummary::from_results(&[]),
            navigation_error: Some(error.to_string()),
            page_errors: Vec::new(),
            results: Vec::new(),
        }
    }
}

/// Output format for CLI results
#[derive(Clone, Copy, Debug, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format for programmatic consumption
    Json,
    /// Human-readable simple format
    Simple,
}

/// Browser viewport dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl ViewportSize {
    /// Parse viewport size from "WIDTHxHEIGHT" format (e.g., "1920x1080")
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('x').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid viewport format. Use WIDTHxHEIGHT (e.g., 1920x1080)");
        }

        let width = parts[0]
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid width in viewport size"))?;
        let height = parts[1]
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid height in viewport size"))?;

        Ok(ViewportSize { width, height })
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
