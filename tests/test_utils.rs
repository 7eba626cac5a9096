// Test utilities for WebDriver tests
#![allow(dead_code)]

use std::sync::Arc;
use tokio::sync::Mutex;

use pageprobe::browser::{Browser, BrowserType};
use pageprobe::driver::GLOBAL_DRIVER_MANAGER;


// Global test lock to prevent concurrent WebDriver starts
lazy_static::lazy_static! {
    static ref WEBDRIVER_LOCK: Arc<Mutex<()>> = Arc::new(Mutex::new(()));
}

/// Get a test browser instance with proper WebDriver management.
/// Returns None when no WebDriver can be started on this machine, in which
/// case browser-dependent tests are skipped.
pub async fn get_test_browser_with_retry() -> Option<Browser> {
    // Acquire lock to prevent concurrent WebDriver starts
    let _lock = WEBDRIVER_LOCK.lock().await;

    for browser_type in &[BrowserType::Chrome, BrowserType::Firefox] {
        for attempt in 1..=3 {
            match Browser::new(*browser_type, None, true).await {
                Ok(browser) => {
                    eprintln!("Created {:?} browser on attempt {}", browser_type, attempt);
                    return Some(browser);
                }
                Err(e) => {
                    eprintln!("Attempt {} failed for {:?}: {}", attempt, browser_type, e);
                    if attempt < 3 {
                        tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
                    }
                }
            }
        }
    }

    eprintln!("WARNING: Could not create test browser after all attempts");
    None
}

/// Start the probe test server on an ephemeral port; returns its base URL
pub async fn spawn_test_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test server");
    let addr = listener.local_addr().expect("no local addr");

    let app = test_server_app::create_app();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{}", addr)
}

/// Clean up WebDriver processes after tests
pub fn cleanup_webdrivers() {
    GLOBAL_DRIVER_MANAGER.stop_all();
}
