//! Interactive WebSocket client for the Hibiki hub.
//!
//! Sends every line typed at the prompt to the hub and prints every broadcast,
//! including your own messages echoed back. Automatically reconnects on
//! disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hibiki-client -- --name alice
//! cargo run --bin hibiki-client -- -n bob -u ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;
use hibiki_client::run_client;
use hibiki_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hibiki-client")]
#[command(about = "WebSocket client for the Hibiki fan-out hub", long_about = None)]
struct Args {
    /// Name shown in front of your messages
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = run_client(args.url, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
