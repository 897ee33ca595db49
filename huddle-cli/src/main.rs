use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use huddle_server::RelayConfig;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "huddle")]
#[command(bin_name = "huddle")]
#[command(about = "Signaling relay for peer-to-peer voice and video calls")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Serve {
        #[arg(short, long, env = "HUDDLE_LISTEN", default_value = "0.0.0.0:3000")]
        listen: SocketAddr,

        /// STUN servers handed to clients, comma separated.
        #[arg(long = "stun-url", env = "STUN_URLS", value_delimiter = ',')]
        stun_urls: Vec<String>,

        #[arg(long, env = "TURN_URL")]
        turn_url: Option<String>,

        #[arg(long, env = "TURN_USERNAME", requires = "turn_url")]
        turn_username: Option<String>,

        #[arg(long, env = "TURN_CREDENTIAL", requires = "turn_url")]
        turn_credential: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve {
            listen,
            stun_urls,
            turn_url,
            turn_username,
            turn_credential,
        } => {
            let mut config = RelayConfig::new(listen).with_stun(stun_urls);
            if let Some(url) = turn_url {
                config = config.with_turn(url, turn_username, turn_credential);
            }

            println!("{}", "📡 Starting Huddle relay...".green().bold());
            println!("   🔌 WebSocket: ws://{}/ws", config.listen_addr);
            println!("   ❤️  Health:    http://{}/health", config.listen_addr);
            if config.ice_servers.is_empty() {
                println!("   {}", "No ICE servers configured".yellow());
            }
            for server in &config.ice_servers {
                println!("   🧊 ICE:       {}", server.urls.join(", ").cyan());
            }

            info!(
                "Relay configured with {} ICE server entries",
                config.ice_servers.len()
            );
            huddle_server::serve(config)
                .await
                .context("Relay stopped with an error")?;

            println!("{}", "👋 Relay shut down".green());
        }
    }

    Ok(())
}
