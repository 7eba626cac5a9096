//! Stateless HTTP relay in front of a hosted text-generation API.
//!
//! Three fixed JSON-in/JSON-out routes (`/read`, `/edit`, `/analyze`)
//! template a prompt from the request body, forward it upstream, and return
//! the raw completion. The relay shares no state or protocol with the
//! element prober.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

pub mod inference;
pub mod prompts;

pub use inference::{DEFAULT_API_BASE, DEFAULT_MODEL, InferenceClient};

#[derive(Clone)]
pub struct RelayState {
    inference: InferenceClient,
}

impl RelayState {
    pub fn new(inference: InferenceClient) -> Self {
        RelayState { inference }
    }
}

/// Build the relay router
pub fn app(state: RelayState) -> Router {
    Router::new()
        .route("/", get(help))
        .route("/help", get(help))
        .route("/read", post(read_content))
        .route("/edit", post(edit_content))
        .route("/analyze", post(analyze_content))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn default_read_type() -> String {
    "general".to_string()
}

fn default_edit_type() -> String {
    "improve".to_string()
}

fn default_analyze_type() -> String {
    "comprehensive".to_string()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadRequest {
    content: String,
    #[serde(default = "default_read_type")]
    analysis_type: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditRequest {
    content: String,
    edit_instructions: String,
    #[serde(default = "default_edit_type")]
    edit_type: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    content_id: String,
    content: String,
    #[serde(default = "default_analyze_type")]
    analysis_type: String,
}

async fn read_content(
    State(state): State<RelayState>,
    Json(req): Json<ReadRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    info!(
        "Read request: {} chars, {} analysis",
        req.content.len(),
        req.analysis_type
    );

    let prompt = prompts::build_read_prompt(&req.content, &req.analysis_type);
    match state.inference.complete(&prompt).await {
        Ok(analysis) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "analysis": analysis,
                "originalContent": req.content,
                "analysisType": req.analysis_type,
            })),
        ),
        Err(e) => relay_error(e),
    }
}

async fn edit_content(
    State(state): State<RelayState>,
    Json(req): Json<EditRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    info!(
        "Edit request: {} chars, {} edit",
        req.content.len(),
        req.edit_type
    );

    let prompt = prompts::build_edit_prompt(&req.content, &req.edit_instructions, &req.edit_type);
    match state.inference.complete(&prompt).await {
        Ok(edited) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "originalContent": req.content,
                "editedContent": edited,
                "editInstructions": req.edit_instructions,
                "editType": req.edit_type,
            })),
        ),
        Err(e) => relay_error(e),
    }
}

async fn analyze_content(
    State(state): State<RelayState>,
    Json(req): Json<AnalyzeRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    info!(
        "Analyze request: id {}, {} analysis",
        req.content_id, req.analysis_type
    );

    let prompt = prompts::build_analysis_prompt(&req.content_id, &req.content, &req.analysis_type);
    match state.inference.complete(&prompt).await {
        Ok(analysis) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "contentId": req.content_id,
                "analysis": analysis,
                "analysisType": req.analysis_type,
            })),
        ),
        Err(e) => relay_error(e),
    }
}

fn relay_error(e: anyhow::Error) -> (StatusCode, Json<serde_json::Value>) {
    error!("Relay error: {:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": e.to_string() })),
    )
}

async fn help() -> &'static str {
    r#"
# AI Content Relay

## Endpoints:

### POST /read
Read and analyze content
Body: { "content": "text to analyze", "analysisType": "general|detailed|summary" }

### POST /edit
Edit content with AI assistance
Body: { "content": "text to edit", "editInstructions": "how to edit", "editType": "improve|rewrite|summarize" }

### POST /analyze
Analyze content with specific ID
Body: { "contentId": "unique-id", "content": "text to analyze", "analysisType": "comprehensive|quick|detailed" }

## Example Usage:
curl -X POST http://localhost:8787/read \
  -H "Content-Type: application/json" \
  -d '{"content": "Your text here", "analysisType": "detailed"}'
"#
}
