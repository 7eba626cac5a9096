use anyhow::{Context, Result};
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::driver::GLOBAL_DRIVER_MANAGER;
use crate::errors::PageprobeError;
use crate::types::ViewportSize;

/// Browser instance for WebDriver automation
pub struct Browser {
    client: Client,
    browser_type: BrowserType,
}

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BrowserType {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl std::str::FromStr for BrowserType {
    type Err = anyhow::Error;

    /// Parse browser type from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserType::Firefox),
            "chrome" | "chromium" => Ok(BrowserType::Chrome),
            _ => anyhow::bail!("Unsupported browser: {}", s),
        }
    }
}

impl BrowserType {
    /// Name of the WebDriver binary for this browser
    pub fn driver_name(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "geckodriver",
            BrowserType::Chrome => "chromedriver",
        }
    }
}

impl Browser {
    /// Create a new browser instance
    ///
    /// # Arguments
    /// * `browser_type` - Firefox or Chrome
    /// * `viewport` - Optional viewport dimensions
    /// * `headless` - Whether to run in headless mode
    pub async fn new(
        browser_type: BrowserType,
        viewport: Option<ViewportSize>,
        headless: bool,
    ) -> Result<Self> {
        info!("Connecting to {:?} WebDriver", browser_type);

        // Ensure WebDriver is running (will auto-start if needed)
        let webdriver_url = GLOBAL_DRIVER_MANAGER.ensure_driver(&browser_type).await?;

        let mut caps = serde_json::Map::new();

        match &browser_type {
            BrowserType::Firefox => {
                let mut firefox_opts = serde_json::Map::new();
                let mut args = Vec::new();

                if headless {
                    args.push("--headless".to_string());
                }

                if let Some(vp) = &viewport {
                    args.push(format!("--width={}", vp.width));
                    args.push(format!("--height={}", vp.height));
                }

                firefox_opts.insert("args".to_string(), json!(args));
                caps.insert("moz:firefoxOptions".to_string(), json!(firefox_opts));
            }
            BrowserType::Chrome => {
                let mut chrome_opts = serde_json::Map::new();
                let mut args = vec!["--no-sandbox".to_string()];

                if headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                    args.push("--disable-dev-shm-usage".to_string());
                }

                if let Some(vp) = &viewport {
                    args.push(format!("--window-size={},{}", vp.width, vp.height));
                }

                // Chrome refuses to share a user-data-dir between sessions
                let profile_dir = tempfile::Builder::new()
                    .prefix("pageprobe-chrome-")
                    .tempdir()?;
                #[allow(deprecated)]
                let profile_path = profile_dir.into_path();
                args.push(format!("--user-data-dir={}", profile_path.display()));

                chrome_opts.insert("args".to_string(), json!(args));
                caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
            }
        }

        debug!("Connecting to WebDriver at {}", webdriver_url);

        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(&webdriver_url)
            .await
            .map_err(|e| {
                PageprobeError::WebDriverFailed(format!(
                    "Failed to connect to WebDriver at {}: {}. Ensure {} is installed and on PATH",
                    webdriver_url,
                    e,
                    browser_type.driver_name()
                ))
            })?;

        // Set viewport size after connection if specified (best-effort)
        if let Some(vp) = viewport {
            debug!("Setting viewport to {}x{}", vp.width, vp.height);
            if let Err(e) = client.set_window_size(vp.width, vp.height).await {
                debug!("Note: Could not set window size: {}", e);
            }
        }

        Ok(Browser {
            client,
            browser_type,
        })
    }

    pub fn browser_type(&self) -> BrowserType {
        self.browser_type
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);

        self.client
            .goto(url)
            .await
            .context(format!("Failed to load {}", url))?;

        // Wait for the page to be ready to avoid stale element references
        let wait_script = "return document.readyState === 'complete';";
        for _ in 0..20 {
            // Max 2 seconds
            match self.client.execute(wait_script, vec![]).await {
                Ok(val) if val.as_bool().unwrap_or(false) => break,
                _ => tokio::time::sleep(Duration::from_millis(100)).await,
            }
        }

        Ok(())
    }

    /// Load the primary target, falling back to a secondary target (typically
    /// a local file) when the primary cannot be reached. After a successful
    /// load, console error capture is installed and the settle pause runs so
    /// client-side rendering can finish before discovery.
    ///
    /// Returns the target that was actually loaded. Both targets failing is a
    /// fatal [`PageprobeError::Navigation`].
    pub async fn load_with_fallback(
        &self,
        primary: &str,
        fallback: Option<&str>,
        settle: Duration,
    ) -> Result<String> {
        let loaded = match self.goto(primary).await {
            Ok(()) => primary.to_string(),
            Err(primary_err) => {
                let Some(secondary) = fallback else {
                    return Err(PageprobeError::Navigation(format!(
                        "{} could not be loaded: {}",
                        primary, primary_err
                    ))
                    .into());
                };
                warn!(
                    "Failed to load {}, trying fallback {}: {}",
                    primary, secondary, primary_err
                );
                match self.goto(secondary).await {
                    Ok(()) => secondary.to_string(),
                    Err(fallback_err) => {
                        return Err(PageprobeError::Navigation(format!(
                            "both targets failed: {} ({}); {} ({})",
                            primary, primary_err, secondary, fallback_err
                        ))
                        .into());
                    }
                }
            }
        };

        self.setup_error_capture().await?;

        debug!("Settling for {}ms before discovery", settle.as_millis());
        tokio::time::sleep(settle).await;

        Ok(loaded)
    }

    async fn setup_error_capture(&self) -> Result<()> {
        // Inject JavaScript to collect error-level console output
        let capture_script = r#"
            (function() {
                if (window.__pageprobe_error_capture) return;
                window.__pageprobe_error_capture = true;
                window.__pageprobe_errors = [];

                function record(message) {
                    window.__pageprobe_errors.push(String(message));
                    if (window.__pageprobe_errors.length > 200) {
                        window.__pageprobe_errors.shift();
                    }
                }

                const originalError = console.error;
                console.error = function(...args) {
                    record(args.map(a => {
                        if (typeof a === 'object') {
                            try { return JSON.stringify(a); } catch (e) { return String(a); }
                        }
                        return String(a);
                    }).join(' '));
                    originalError.apply(console, args);
                };

                window.addEventListener('error', function(event) {
                    record(`Uncaught ${event.error || event.message} at ${event.filename}:${event.lineno}:${event.colno}`);
                });

                window.addEventListener('unhandledrejection', function(event) {
                    record(`Unhandled Promise Rejection: ${event.reason}`);
                });
            })();
        "#;

        // Ignore failures: some pages forbid script injection
        let _ = self.client.execute(capture_script, vec![]).await;

        Ok(())
    }

    /// Console error messages collected since capture was installed
    pub async fn page_errors(&self) -> Result<Vec<String>> {
        let script = "return window.__pageprobe_errors || [];";

        match self.client.execute(script, vec![]).await {
            Ok(value) => Ok(serde_json::from_value(value).unwrap_or_default()),
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Find all elements matching a CSS selector, in document order.
    ///
    /// An empty match is not an error here: a zero-element probe run is a
    /// valid run and must still produce a report.
    pub async fn find_elements(&self, selector: &str) -> Result<Vec<Element>> {
        debug!("Finding elements with selector: {}", selector);
        let elements = self
            .client
            .find_all(Locator::Css(selector))
            .await
            .context(format!("Failed to query selector: {}", selector))?;
        Ok(elements)
    }

    /// Get the current URL - useful for health checks
    pub async fn get_current_url(&self) -> Result<String> {
        Ok(self.client.current_url().await?.to_string())
    }

    /// Coarse page state: current URL plus total element count. Used by the
    /// stricter observable-effect check to decide whether a click changed
    /// anything.
    pub async fn page_fingerprint(&self) -> Result<(String, u64)> {
        let url = self.get_current_url().await?;
        let count = self
            .client
            .execute("return document.querySelectorAll('*').length;", vec![])
            .await?
            .as_u64()
            .unwrap_or(0);
        Ok((url, count))
    }

    /// Close the browser session
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}
