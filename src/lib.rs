//! # pageprobe
#![allow(clippy::uninlined_format_args)]
//!
//! CLI tool that smoke-tests a deployed web application over WebDriver:
//! it enumerates interactive elements (buttons, inputs, links), exercises
//! each one, and reports which are functional and which are not.
//!
//! A small AI content relay ships alongside: an HTTP server that templates
//! prompts and forwards them to a hosted text-generation API under three
//! fixed routes (`/read`, `/edit`, `/analyze`), plus a companion command
//! that issues sample requests against it.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Probe every button, input, and link on a page
//! pageprobe probe "https://example.github.io/my-app/"
//!
//! # Probe buttons only, with a local-file fallback target
//! pageprobe probe "https://example.github.io/my-app/" \
//!     --kind button --fallback "file:///home/me/my-app/index.html"
//!
//! # Custom selector, tighter per-element timeout, Chrome
//! pageprobe probe "https://example.com" \
//!     --selector "button.primary" --timeout-ms 1000 --browser chrome
//!
//! # Write the JSON report somewhere specific
//! pageprobe probe "https://example.com" --output results/smoke.json
//!
//! # Run the AI relay (token comes from CLOUDFLARE_API_TOKEN)
//! pageprobe serve --account-id YOUR_ACCOUNT --listen 127.0.0.1:8787
//!
//! # Exercise a running relay, or just print the curl equivalents
//! pageprobe relay-test --url http://127.0.0.1:8787
//! pageprobe relay-test --curl
//! ```
//!
//! ## Report shape
//!
//! The probe writes a pretty-printed JSON report with a `summary` section
//! (totals, counts, functionality rate) and a `results` list preserving
//! discovery order. The same structure is returned in memory by
//! [`probe::Prober::run`] for library callers.
//!
//! ## Library Usage
//!
//! ```no_run
//! use pageprobe::browser::{Browser, BrowserType};
//! use pageprobe::probe::{ProbeConfig, Prober};
//! use pageprobe::types::ElementKind;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let browser = Browser::new(BrowserType::Firefox, None, true).await?;
//! browser
//!     .load_with_fallback("https://example.com", None, std::time::Duration::from_secs(2))
//!     .await?;
//!
//! let prober = Prober::new(&browser, ProbeConfig::default());
//! let results = prober.run(&[ElementKind::Button]).await?;
//! # Ok(())
//! # }
//! ```

/// WebDriver browser control: navigation, element discovery, page state
pub mod browser;

/// CLI subcommand handlers
pub mod commands;

/// Automatic WebDriver process management
pub mod driver;

/// Error type with process exit codes
pub mod errors;

/// The element prober: discovery, classification, aggregation
pub mod probe;

/// AI content relay: HTTP routes, prompt templates, upstream client
pub mod relay;

/// Report sink: JSON file output and console summary
pub mod report;

/// Type definitions for probe results and reports
pub mod types;

pub use browser::{Browser, BrowserType};
pub use errors::PageprobeError;
pub use probe::{ProbeConfig, Prober};
pub use types::{
    ElementKind, ElementProbeResult, OutputFormat, ProbeOutcome, ProbeReport, ProbeSummary,
    ViewportSize,
};
