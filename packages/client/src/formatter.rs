//! Message formatting utilities for client display.

use hibiki_shared::time::timestamp_to_jst_clock;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Build the line sent to the hub for a typed message.
    ///
    /// The hub is anonymous, so the sender's name travels inside the message.
    pub fn format_outgoing(name: &str, line: &str) -> String {
        format!("{}: {}", name, line)
    }

    /// Format a frame received from the hub.
    ///
    /// One frame may carry several broadcasts separated by `\n`; each one is
    /// printed on its own line with the time it was received.
    ///
    /// # Arguments
    ///
    /// * `payload` - Text of the received frame
    /// * `received_at` - Unix timestamp when the frame arrived (milliseconds)
    pub fn format_received(payload: &str, received_at: i64) -> String {
        let time = timestamp_to_jst_clock(received_at).unwrap_or_else(|| "--:--:--".to_string());
        let mut output = String::from("\n");
        for message in payload.split('\n') {
            output.push_str(&format!("[{}] {}\n", time, message));
        }
        output
    }

    /// Format a binary frame (shown only by size)
    pub fn format_binary(len: usize) -> String {
        format!("\n[binary message: {} bytes]\n", len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2023-01-01 12:34:56 JST in milliseconds
    const RECEIVED_AT: i64 = 1672498800000 + ((12 * 3600 + 34 * 60 + 56) * 1000);

    #[test]
    fn test_format_outgoing_prefixes_name() {
        // テスト項目: 送信メッセージの先頭に名前が付く
        // given (前提条件):
        let name = "alice";

        // when (操作):
        let result = MessageFormatter::format_outgoing(name, "hello");

        // then (期待する結果):
        assert_eq!(result, "alice: hello");
    }

    #[test]
    fn test_format_received_single_message() {
        // テスト項目: 1 件のメッセージが受信時刻付きで 1 行に表示される
        // given (前提条件):
        let payload = "bob: hi";

        // when (操作):
        let result = MessageFormatter::format_received(payload, RECEIVED_AT);

        // then (期待する結果):
        assert_eq!(result, "\n[12:34:56] bob: hi\n");
    }

    #[test]
    fn test_format_received_splits_coalesced_messages() {
        // テスト項目: 改行でまとめられた複数メッセージはそれぞれ別の行に表示される
        // given (前提条件):
        let payload = "alice: one\nbob: two";

        // when (操作):
        let result = MessageFormatter::format_received(payload, RECEIVED_AT);

        // then (期待する結果):
        assert_eq!(result, "\n[12:34:56] alice: one\n[12:34:56] bob: two\n");
    }

    #[test]
    fn test_format_binary_shows_size() {
        // テスト項目: バイナリメッセージはサイズだけが表示される
        // given (前提条件):
        let len = 42;

        // when (操作):
        let result = MessageFormatter::format_binary(len);

        // then (期待する結果):
        assert_eq!(result, "\n[binary message: 42 bytes]\n");
    }
}
