#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pageprobe::commands;
use pageprobe::driver::GLOBAL_DRIVER_MANAGER;
use pageprobe::errors::PageprobeError;
use pageprobe::relay;
use pageprobe::types::{ElementKind, OutputFormat};

const EXIT_SUCCESS: i32 = 0;

#[derive(Parser)]
#[command(name = "pageprobe")]
#[command(about = "Smoke-test the interactive elements of a web page", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe a page's interactive elements and report functional vs non-functional
    Probe {
        /// Primary target URL
        url: String,

        /// Secondary target to try when the primary cannot be loaded
        /// (typically a file:// URL)
        #[arg(long)]
        fallback: Option<String>,

        /// Element kind to probe; repeatable. Defaults to all kinds
        #[arg(long = "kind", value_enum)]
        kinds: Vec<ElementKind>,

        /// Override the kind's default CSS selector
        #[arg(long)]
        selector: Option<String>,

        /// Report file path
        #[arg(short, long, default_value = "probe-results.json")]
        output: String,

        /// Output format
        #[arg(short, long, default_value = "simple")]
        format: OutputFormat,

        /// Browser to use
        #[arg(short, long, default_value = "firefox")]
        browser: String,

        /// Run browser in visible mode (disables headless)
        #[arg(long = "no-headless")]
        no_headless: bool,

        /// Set viewport size (WIDTHxHEIGHT, e.g., 1920x1080)
        #[arg(long)]
        viewport: Option<String>,

        /// Grace pause after load so client-side rendering can finish
        #[arg(long, default_value = "2000")]
        settle_ms: u64,

        /// Upper bound on a single interaction attempt
        #[arg(long, default_value = "1500")]
        timeout_ms: u64,

        /// Pause after each interaction so page effects settle
        #[arg(long, default_value = "500")]
        pause_ms: u64,

        /// Probe at most this many elements per kind
        #[arg(long)]
        max_elements: Option<usize>,

        /// Require a click to visibly change the page before calling it
        /// functional
        #[arg(long)]
        require_effect: bool,

        /// Value written into inputs for the fill-then-read-back check
        #[arg(long, default_value = "test input")]
        probe_text: String,
    },

    /// Run the AI content relay HTTP server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8787")]
        listen: String,

        /// Cloudflare account ID
        #[arg(long)]
        account_id: String,

        /// API token (falls back to CLOUDFLARE_API_TOKEN)
        #[arg(long)]
        api_token: Option<String>,

        /// Model to run
        #[arg(long, default_value = relay::DEFAULT_MODEL)]
        model: String,

        /// Inference API base URL
        #[arg(long, default_value = relay::DEFAULT_API_BASE)]
        upstream: String,
    },

    /// Issue sample requests against a running relay
    RelayTest {
        /// Relay base URL
        #[arg(long, default_value = "http://127.0.0.1:8787")]
        url: String,

        /// Print curl-equivalent commands instead of sending requests
        #[arg(long)]
        curl: bool,
    },
}

#[tokio::main]
async fn main() {
    let result = run().await;

    // Always clean up WebDriver processes before exiting
    GLOBAL_DRIVER_MANAGER.stop_all();

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            // Convert to our error type to get the proper exit code
            let probe_err: PageprobeError = err.into();

            // Output JSON error to stdout for programmatic consumption
            let error_json = json!({
                "error": true,
                "message": probe_err.to_string(),
                "exit_code": probe_err.exit_code()
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );

            // Also log to stderr for human reading
            eprintln!("Error: {}", probe_err);
            std::process::exit(probe_err.exit_code());
        }
    }
}

async fn run() -> Result<()> {
    // Initialize tracing to stderr (so JSON output to stdout remains clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pageprobe=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Probe {
            url,
            fallback,
            kinds,
            selector,
            output,
            format,
            browser,
            no_headless,
            viewport,
            settle_ms,
            timeout_ms,
            pause_ms,
            max_elements,
            require_effect,
            probe_text,
        } => {
            commands::probe::handle_probe(
                url,
                fallback,
                kinds,
                selector,
                output,
                format,
                browser,
                no_headless,
                viewport,
                settle_ms,
                timeout_ms,
                pause_ms,
                max_elements,
                require_effect,
                probe_text,
            )
            .await?
        }

        Commands::Serve {
            listen,
            account_id,
            api_token,
            model,
            upstream,
        } => commands::serve::handle_serve(listen, account_id, api_token, model, upstream).await?,

        Commands::RelayTest { url, curl } => {
            commands::relay_test::handle_relay_test(url, curl).await?
        }
    }

    Ok(())
}
