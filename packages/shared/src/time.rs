//! Time helpers for displaying message timestamps.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};

/// JST offset in seconds (UTC+9).
const JST_OFFSET_SECS: i32 = 9 * 3600;

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Get the current Unix timestamp in milliseconds.
pub fn current_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn to_jst(timestamp_millis: i64) -> Option<DateTime<FixedOffset>> {
    jst().timestamp_millis_opt(timestamp_millis).single()
}

/// Convert a Unix timestamp (milliseconds) to RFC 3339 in JST.
///
/// Returns `None` for timestamps chrono cannot represent.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> Option<String> {
    to_jst(timestamp_millis).map(|dt| dt.to_rfc3339())
}

/// Convert a Unix timestamp (milliseconds) to a `HH:MM:SS` clock time in JST.
pub fn timestamp_to_jst_clock(timestamp_millis: i64) -> Option<String> {
    to_jst(timestamp_millis).map(|dt| dt.format("%H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_timestamp_millis_returns_positive_value() {
        // テスト項目: current_timestamp_millis が正の値を返す
        // given (前提条件):

        // when (操作):
        let timestamp = current_timestamp_millis();

        // then (期待する結果):
        assert!(timestamp > 0);
    }

    #[test]
    fn test_timestamp_to_jst_rfc3339_format() {
        // テスト項目: タイムスタンプが正しく RFC 3339 形式に変換される
        // given (前提条件):
        // 2023-01-01 00:00:00 JST in milliseconds
        let timestamp = 1672498800000;

        // when (操作):
        let result = timestamp_to_jst_rfc3339(timestamp).unwrap();

        // then (期待する結果):
        assert!(result.starts_with("2023-01-01T00:00:00"));
        assert!(result.contains("+09:00"));
    }

    #[test]
    fn test_timestamp_to_jst_clock_format() {
        // テスト項目: タイムスタンプが HH:MM:SS 形式に変換される
        // given (前提条件):
        // 2023-01-01 12:34:56 JST in milliseconds
        let timestamp = 1672498800000 + ((12 * 3600 + 34 * 60 + 56) * 1000);

        // when (操作):
        let result = timestamp_to_jst_clock(timestamp);

        // then (期待する結果):
        assert_eq!(result.as_deref(), Some("12:34:56"));
    }

    #[test]
    fn test_timestamp_out_of_range_returns_none() {
        // テスト項目: 表現できないタイムスタンプは None になる
        // given (前提条件):
        let timestamp = i64::MAX;

        // when (操作):
        let result = timestamp_to_jst_rfc3339(timestamp);

        // then (期待する結果):
        assert!(result.is_none());
    }
}
