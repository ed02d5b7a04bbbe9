//! WebSocket hub server with broadcast to every connected client.
//!
//! Receives messages from clients and broadcasts them to all connected clients,
//! the sender included.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hibiki-server
//! cargo run --bin hibiki-server -- --host 0.0.0.0 --port 3000 --pong-wait-secs 30
//! ```

use std::time::Duration;

use clap::Parser;
use hibiki_server::{
    client::{
        ClientConfig, MAX_MESSAGE_SIZE, MAX_WAIT_SECS, PONG_WAIT, SEND_BUFFER, WRITE_WAIT,
    },
    hub::Hub,
    ui::Server,
};
use hibiki_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hibiki-server")]
#[command(about = "WebSocket fan-out hub server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seconds to wait for a pong before dropping a connection (pings go out at 9/10 of it)
    #[arg(long, default_value_t = PONG_WAIT.as_secs(), value_parser = clap::value_parser!(u64).range(1..=MAX_WAIT_SECS))]
    pong_wait_secs: u64,

    /// Seconds allowed for a single write to a connection
    #[arg(long, default_value_t = WRITE_WAIT.as_secs(), value_parser = clap::value_parser!(u64).range(1..=MAX_WAIT_SECS))]
    write_wait_secs: u64,

    /// Maximum inbound message size in bytes
    #[arg(long, default_value_t = MAX_MESSAGE_SIZE)]
    max_message_size: usize,

    /// Outbound messages buffered per client before it is evicted as a slow consumer
    #[arg(long, default_value_t = SEND_BUFFER)]
    send_buffer: usize,
}

impl Args {
    fn client_config(&self) -> Result<ClientConfig, String> {
        if self.max_message_size == 0 {
            return Err("--max-message-size must be at least 1".to_string());
        }
        if self.send_buffer == 0 {
            return Err("--send-buffer must be at least 1".to_string());
        }

        Ok(ClientConfig {
            write_wait: Duration::from_secs(self.write_wait_secs),
            pong_wait: Duration::from_secs(self.pong_wait_secs),
            max_message_size: self.max_message_size,
            send_buffer: self.send_buffer,
        })
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let client_config = match args.client_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    tracing::debug!("Client configuration: {:?}", client_config);

    // The hub lives for the whole process.
    let (hub, hub_task) = Hub::spawn();
    let server = Server::new(hub, client_config);

    tokio::select! {
        result = server.run(args.host, args.port) => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
                std::process::exit(1);
            }
        }
        result = hub_task => {
            // The server holds a handle, so the loop can only end by panicking.
            tracing::error!("Hub coordination loop ended unexpectedly: {:?}", result);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_longer_than_a_day_is_rejected() {
        // テスト項目: 1 日を超える pong 待ち時間と書き込み待ち時間は起動時に拒否される
        // given (前提条件):
        let too_long = (MAX_WAIT_SECS + 1).to_string();

        // when (操作):
        let pong = Args::try_parse_from(["hibiki-server", "--pong-wait-secs", &too_long]);
        let write = Args::try_parse_from(["hibiki-server", "--write-wait-secs", &too_long]);

        // then (期待する結果):
        assert!(pong.is_err());
        assert!(write.is_err());
    }

    #[test]
    fn test_wait_of_exactly_a_day_is_accepted() {
        // テスト項目: 上限ちょうどの待ち時間は受け付けられる
        // given (前提条件):
        let max = MAX_WAIT_SECS.to_string();

        // when (操作):
        let args = Args::try_parse_from(["hibiki-server", "--pong-wait-secs", &max]).unwrap();
        let config = args.client_config().unwrap();

        // then (期待する結果):
        assert_eq!(config.pong_wait, Duration::from_secs(MAX_WAIT_SECS));
        assert!(config.ping_period() < config.pong_wait);
    }
}
