use anyhow::{Context, Result};
use std::net::SocketAddr;
use tracing::info;

use crate::relay::{self, InferenceClient, RelayState};

pub async fn handle_serve(
    listen: String,
    account_id: String,
    api_token: Option<String>,
    model: String,
    upstream: String,
) -> Result<()> {
    let token = match api_token {
        Some(t) => t,
        None => std::env::var("CLOUDFLARE_API_TOKEN")
            .context("Provide --api-token or set CLOUDFLARE_API_TOKEN")?,
    };

    let addr: SocketAddr = listen.parse().context("Invalid listen address")?;

    let inference = InferenceClient::new(&upstream, &account_id, &token, &model);
    let state = RelayState::new(inference);
    let app = relay::app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!("AI relay listening on {} (model {})", addr, model);

    axum::serve(listener, app).await?;
    Ok(())
}
