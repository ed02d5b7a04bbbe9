//! Keepalive and buffering parameters of a client connection.

use std::time::Duration;

/// Time allowed to write a frame to the peer.
pub const WRITE_WAIT: Duration = Duration::from_secs(10);

/// Time allowed between keepalive acknowledgments from the peer.
pub const PONG_WAIT: Duration = Duration::from_secs(60);

/// Maximum inbound message size in bytes.
pub const MAX_MESSAGE_SIZE: usize = 512;

/// Capacity of each client's outbound queue.
pub const SEND_BUFFER: usize = 256;

/// Upper bound, in seconds, accepted for `write_wait` and `pong_wait`.
pub const MAX_WAIT_SECS: u64 = 86_400;

/// Per-connection tunables.
///
/// The ping period is always derived from `pong_wait` so that a probe is sent
/// before the peer's read deadline expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    pub write_wait: Duration,
    pub pong_wait: Duration,
    pub max_message_size: usize,
    pub send_buffer: usize,
}

impl ClientConfig {
    /// Period of keepalive probes: 9/10 of `pong_wait`.
    pub fn ping_period(&self) -> Duration {
        (self.pong_wait / 10 * 9).max(Duration::from_millis(1))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            write_wait: WRITE_WAIT,
            pong_wait: PONG_WAIT,
            max_message_size: MAX_MESSAGE_SIZE,
            send_buffer: SEND_BUFFER,
        }
    }
}
