use thiserror::Error;

/// Custom error type that includes exit codes
#[derive(Debug, Error)]
pub enum PageprobeError {
    /// Neither the primary nor the fallback target could be loaded (exit code 2)
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// WebDriver connection failed (exit code 4)
    #[error("WebDriver connection failed: {0}")]
    WebDriverFailed(String),
    /// Operation timeout (exit code 5)
    #[error("Operation timed out: {0}")]
    Timeout(String),
    /// Generic error (exit code 1)
    #[error("{0}")]
    Other(anyhow::Error),
}

impl PageprobeError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PageprobeError::Navigation(_) => 2,
            PageprobeError::WebDriverFailed(_) => 4,
            PageprobeError::Timeout(_) => 5,
            PageprobeError::Other(_) => 1,
        }
    }
}

impl From<anyhow::Error> for PageprobeError {
    fn from(err: anyhow::Error) -> Self {
        // A PageprobeError that traveled through anyhow keeps its exit code
        if let Some(own) = err.downcast_ref::<PageprobeError>() {
            return match own {
                PageprobeError::Navigation(m) => PageprobeError::Navigation(m.clone()),
                PageprobeError::WebDriverFailed(m) => PageprobeError::WebDriverFailed(m.clone()),
                PageprobeError::Timeout(m) => PageprobeError::Timeout(m.clone()),
                PageprobeError::Other(_) => PageprobeError::Other(err),
            };
        }

        // Otherwise detect the error class from the message
        let msg = err.to_string();

        if msg.contains("Failed to load") || msg.contains("Navigation failed") {
            PageprobeError::Navigation(msg)
        } else if msg.contains("Failed to connect to WebDriver")
            || msg.contains("WebDriver")
            || msg.contains("geckodriver")
            || msg.contains("chromedriver")
        {
            PageprobeError::WebDriverFailed(msg)
        } else if msg.contains("timeout") || msg.contains("timed out") {
            PageprobeError::Timeout(msg)
        } else {
            PageprobeError::Other(err)
        }
    }
}

#[cfg(test)]
#[path = "errors_test.rs"]
mod errors_test;
