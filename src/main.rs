//! CLI for chathub
//!
//! Subcommands:
//! - `server`: run the WebSocket hub
//! - `client`: join a topic from the terminal

use std::sync::Arc;

use chathub::broker::Hub;
use chathub::client::{Terminal, session};
use chathub::config::{Settings, load_config};
use chathub::transport::start_websocket_server;
use chathub::utils::{Result, logging};
use clap::Parser;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "chathub")]
enum Command {
    /// Start the WebSocket hub
    Server,
    /// Chat from the terminal: each stdin line is sent, EOF leaves
    Client {
        /// WebSocket server URL to connect to
        #[arg(long, default_value = "ws://127.0.0.1:8080")]
        url: String,
        /// Topic to join [default: hub.default_topic from configuration]
        #[arg(long)]
        topic: Option<String>,
        /// Name shown to other participants
        #[arg(long, default_value = "anonymous")]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cmd = Command::parse();

    match cmd {
        Command::Server => {
            let settings = load_config();
            let level = settings
                .as_ref()
                .map(|s| s.log.level.as_str())
                .unwrap_or("info");
            logging::init(level);

            match settings {
                Ok(settings) => {
                    if let Err(e) = run_server(settings).await {
                        error!("Server failed: {e}");
                    }
                }
                Err(e) => error!("Failed to load configuration: {e}"),
            }
        }
        Command::Client { url, topic, name } => {
            // chat lines share stdout with the log output
            logging::init("warn");
            let settings = load_config().unwrap_or_else(|e| {
                warn!("Failed to load configuration, using defaults: {e}");
                Settings::default()
            });
            let topic = settings.hub.topic_or_default(topic);
            if let Err(e) = run_client(&url, &topic, &name).await {
                error!("Client failed: {e}");
            }
        }
    }
}

async fn run_server(settings: Settings) -> Result<()> {
    let addr = settings.server.addr();
    let hub = Arc::new(Hub::new());

    tokio::select! {
        res = start_websocket_server(addr, hub, settings) => res?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    Ok(())
}

async fn run_client(url: &str, topic: &str, name: &str) -> Result<()> {
    session::run(url, topic, name, session::stdin_lines(), Terminal::stdout()).await?;
    Ok(())
}
