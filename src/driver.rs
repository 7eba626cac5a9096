use anyhow::{Context, Result};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::browser::BrowserType;

/// Manages WebDriver processes (geckodriver, chromedriver)
pub struct DriverManager {
    processes: Mutex<Vec<DriverProcess>>,
}

struct DriverProcess {
    browser_type: BrowserType,
    child: Child,
    port: u16,
    url: String,
}

impl Default for DriverManager {
    fn default() -> Self {
        Self {
            processes: Mutex::new(Vec::new()),
        }
    }
}

impl DriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a WebDriver is running for the given browser type.
    /// Returns the URL to connect to.
    pub async fn ensure_driver(&self, browser_type: &BrowserType) -> Result<String> {
        // Reuse a driver we already started, if it still responds
        let managed_urls: Vec<String> = {
            let processes = self.processes.lock().unwrap();
            processes
                .iter()
                .filter(|p| p.browser_type == *browser_type)
                .map(|p| p.url.clone())
                .collect()
        };

        for url in managed_urls {
            if Self::driver_ready(&url).await {
                debug!("Using existing managed WebDriver at {}", url);
                return Ok(url);
            }
        }

        // Check the standard port for an externally managed driver
        let standard_url = match browser_type {
            BrowserType::Firefox => "http://localhost:4444",
            BrowserType::Chrome => "http://localhost:9515",
        };
        if Self::driver_ready(standard_url).await {
            debug!("Found external WebDriver at {}", standard_url);
            return Ok(standard_url.to_string());
        }

        info!("WebDriver not detected, attempting to start automatically...");
        self.start_driver(browser_type).await
    }

    /// Start a WebDriver process
    async fn start_driver(&self, browser_type: &BrowserType) -> Result<String> {
        let command = browser_type.driver_name();
        let port = Self::find_free_port(browser_type)?;
        info!("Starting {} on port {}", command, port);

        let args = match browser_type {
            BrowserType::Firefox => vec!["--port".to_string(), port.to_string()],
            BrowserType::Chrome => vec![format!("--port={}", port)],
        };

        if !Self::command_exists(command) {
            anyhow::bail!(
                "{} not found in PATH. Please install it:\n\
                  macOS: brew install {}\n\
                  Linux: Download from official releases\n\
                  Or see: https://www.selenium.dev/documentation/webdriver/getting_started/install_drivers/",
                command,
                command
            );
        }

        let child = Command::new(command)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context(format!("Failed to start {}", command))?;

        let url = format!("http://localhost:{}", port);

        {
            let mut processes = self.processes.lock().unwrap();
            processes.push(DriverProcess {
                browser_type: *browser_type,
                child,
                port,
                url: url.clone(),
            });
        }

        // Wait for the driver to report ready (3 seconds total)
        let max_attempts = 30;
        for attempt in 1..=max_attempts {
            if Self::driver_ready(&url).await {
                info!("WebDriver started successfully on port {}", port);
                return Ok(url);
            }
            if attempt < max_attempts {
                sleep(Duration::from_millis(100)).await;
            }
        }

        self.cleanup_failed_process(port);
        anyhow::bail!("WebDriver failed to start within timeout")
    }

    /// Check if a command exists in PATH
    pub fn command_exists(command: &str) -> bool {
        #[cfg(unix)]
        {
            Command::new("which")
                .arg(command)
                .output()
                .map(|output| output.status.success())
                .unwrap_or(false)
        }

        #[cfg(windows)]
        {
            Command::new("where")
                .arg(command)
                .output()
                .map(|output| output.status.success())
                .unwrap_or(false)
        }
    }

    /// Find a free port, preferring the conventional ones for the browser
    pub fn find_free_port(browser_type: &BrowserType) -> Result<u16> {
        let preferred_ports = match browser_type {
            BrowserType::Firefox => [4444, 4445, 4446],
            BrowserType::Chrome => [9515, 9516, 9517],
        };

        for port in preferred_ports {
            if !Self::is_port_in_use(port) {
                debug!("Found free port {} for {:?}", port, browser_type);
                return Ok(port);
            }
        }

        // Fall back to letting the OS assign a port
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        drop(listener);
        Ok(port)
    }

    /// Check if a port is in use
    pub fn is_port_in_use(port: u16) -> bool {
        std::net::TcpListener::bind(("127.0.0.1", port)).is_err()
    }

    /// Check that a WebDriver at the given URL responds and reports ready
    pub async fn driver_ready(url: &str) -> bool {
        let status_url = format!("{}/status", url);

        match reqwest::Client::new()
            .get(&status_url)
            .timeout(Duration::from_secs(1))
            .send()
            .await
        {
            Ok(response) => {
                if let Ok(body) = response.json::<serde_json::Value>().await {
                    body.get("value")
                        .and_then(|v| v.get("ready"))
                        .and_then(|r| r.as_bool())
                        .unwrap_or(false)
                } else {
                    false
                }
            }
            Err(_) => false,
        }
    }

    /// Clean up a process that never became ready
    fn cleanup_failed_process(&self, port: u16) {
        let mut processes = self.processes.lock().unwrap();
        if let Some(index) = processes.iter().position(|p| p.port == port) {
            let mut process = processes.remove(index);
            let _ = process.child.kill();
        }
    }

    /// Stop all managed WebDriver processes
    pub fn stop_all(&self) {
        let mut processes = self.processes.lock().unwrap();
        for process in processes.iter_mut() {
            debug!("Stopping WebDriver on port {}", process.port);
            let _ = process.child.kill();
        }
        processes.clear();
    }
}

impl Drop for DriverManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}

// Global WebDriver manager instance
lazy_static::lazy_static! {
    pub static ref GLOBAL_DRIVER_MANAGER: DriverManager = DriverManager::new();
}
