use anyhow::{Context, Result};
use serde_json::json;
use tracing::debug;

/// System prompt sent with every completion request
const SYSTEM_PROMPT: &str = "You are an expert content analyst and editor. \
Provide clear, helpful, and professional responses.";

/// Default hosted model
pub const DEFAULT_MODEL: &str = "@cf/meta/llama-2-7b-chat-int8";

/// Default Cloudflare REST API base
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Client for the hosted text-generation API.
///
/// The backend is treated as an opaque completion service: one prompt in,
/// one completion out. No retries, no streaming.
#[derive(Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    base_url: String,
    account_id: String,
    api_token: String,
    model: String,
}

impl InferenceClient {
    pub fn new(base_url: &str, account_id: &str, api_token: &str, model: &str) -> Self {
        InferenceClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            account_id: account_id.to_string(),
            api_token: api_token.to_string(),
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Forward a prompt to the inference API and return the completion text
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url, self.account_id, self.model
        );
        debug!("Forwarding prompt to {}", url);

        let body = json!({
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": 1000,
            "temperature": 0.7,
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .context("Failed to reach inference API")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Inference API returned {}: {}", status, text);
        }

        let value: serde_json::Value = response
            .json()
            .await
            .context("Inference API returned invalid JSON")?;

        value
            .get("result")
            .and_then(|r| r.get("response"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Inference API response missing result.response"))
    }
}
