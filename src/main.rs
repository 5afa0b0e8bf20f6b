use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info};

use stylecast::catalog::{Occasion, Weather};
use stylecast::config::{StylistConfig, WebConfig};
use stylecast::constants::DEFAULT_PORT;
use stylecast::gemini::GeminiClient;
use stylecast::stylist::Stylist;
use stylecast::{terminal, web_server};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Gemini API key.
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Model name (defaults to gemini-2.5-flash).
    #[arg(long, global = true, env = "STYLECAST_MODEL")]
    model: Option<String>,
    /// Base URL of the Gemini REST API.
    #[arg(long, global = true, env = "GEMINI_API_BASE")]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

// Define the available subcommands
#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the Stylecast web UI.
    Serve {
        #[arg(long, default_value = "127.0.0.1", help = "Address to listen on.")]
        host: String,
        #[arg(long, default_value_t = DEFAULT_PORT, help = "Port for the web server.")]
        port: u16,
    },
    /// Get one outfit recommendation and print it.
    Style {
        #[arg(long, help = "Occasion slug, e.g. business or date-night.")]
        occasion: Occasion,
        #[arg(long, help = "Weather slug, e.g. rainy.")]
        weather: Weather,
    },
    /// Get a recommendation, then chat with the stylist about it.
    Chat {
        #[arg(long, help = "Occasion slug, e.g. business or date-night.")]
        occasion: Occasion,
        #[arg(long, help = "Weather slug, e.g. rainy.")]
        weather: Weather,
    },
    /// List the available occasions and weather conditions.
    Catalog,
}

fn build_stylist(cli: &Cli) -> Result<Arc<Stylist>> {
    let config = StylistConfig::from_env().with_overrides(cli.api_key.clone(), cli.model.clone(), cli.api_base.clone());
    config.warn_if_incomplete();
    info!(?config, "Model configuration loaded");

    let client = GeminiClient::new(&config).context("Failed to build the Gemini client")?;
    Ok(Arc::new(Stylist::new(Arc::new(client))))
}

// The main entry point of the application, using tokio's async runtime
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for GEMINI_API_KEY and friends)
    dotenvy::dotenv().ok();

    // Initialize tracing (logging) subscriber
    // Reads log level from RUST_LOG environment variable (e.g., RUST_LOG=info,stylecast=debug)
    // Logs go to stderr so `style` and `chat` output stays clean on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { host, port } => {
            info!("Starting Stylecast on {}:{}...", host, port);
            let stylist = build_stylist(&cli)?;
            let web = WebConfig::default();

            let mut web_server_handle = {
                let host = host.clone();
                let port = *port;
                tokio::spawn(async move { web_server::start_web_server(&host, port, stylist, web).await })
            };

            // Keep the main task alive until Ctrl-C or the server stops
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl-C received, shutting down...");
                }
                res = &mut web_server_handle => {
                    match res {
                        Ok(Ok(())) => info!("Web server task completed."),
                        Ok(Err(e)) => {
                            error!("Web server failed: {:?}", e);
                            return Err(e);
                        }
                        // Handle JoinError (e.g., if the task panicked)
                        Err(e) if e.is_panic() => error!("Web server task panicked: {:?}", e),
                        Err(e) => error!("Web server task failed: {:?}", e),
                    }
                }
            }
            if !web_server_handle.is_finished() {
                info!("Aborting web server task...");
                web_server_handle.abort();
            }
            info!("Shutdown complete.");
        }
        Commands::Style { occasion, weather } => {
            let stylist = build_stylist(&cli)?;
            let mut stdout = tokio::io::stdout();
            terminal::style_once(&stylist, *occasion, *weather, &mut stdout).await?;
        }
        Commands::Chat { occasion, weather } => {
            info!("Starting interactive chat session...");
            let stylist = build_stylist(&cli)?;
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            terminal::run_chat_session(&stylist, *occasion, *weather, stdin, &mut stdout)
                .await
                .context("Chat session failed")?;
        }
        Commands::Catalog => {
            print!("{}", terminal::format_catalog());
        }
    }

    Ok(())
}
