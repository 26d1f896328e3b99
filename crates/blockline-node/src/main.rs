//! Blockline console node.
//!
//! # Usage
//!
//! ```bash
//! # Standard cross-taught pair
//! blockline-node
//!
//! # Local instrument from a file, far end derived from it
//! blockline-node --config signal-box.toml
//!
//! # Both ends from files, verbose interlock logs
//! blockline-node --config a.toml --peer-config b.toml --log-level debug
//! ```

use std::path::PathBuf;

use blockline_node::{Command, Console, Flow, pair_configs};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Blockline block instrument node
#[derive(Parser, Debug)]
#[command(name = "blockline-node")]
#[command(about = "Block instrument pair on a simulated CBUS segment")]
#[command(version)]
struct Args {
    /// Local node configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Far end node configuration (TOML)
    #[arg(short, long)]
    peer_config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let [local, peer] = pair_configs(args.config.as_deref(), args.peer_config.as_deref())?;
    tracing::info!(
        local = local.node_number,
        peer = peer.node_number,
        taught = local.events.len(),
        "Blockline node starting"
    );

    let mut console = Console::new(&local, &peer)?;
    console.execute(Command::Status);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(blockline_node::CommandError::Empty) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "ignored");
                continue;
            },
        };
        if console.execute(command) == Flow::Quit {
            break;
        }
    }

    tracing::info!("Blockline node stopped");
    Ok(())
}
