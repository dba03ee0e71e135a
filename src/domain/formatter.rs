/// ドメインサービス: タイムスタンプフォーマット
///
/// gfy の createDate（Unix秒）をユーザー設定のタイムゾーンオフセットで
/// 人間向けの時刻文字列に変換する。
use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Unixタイムスタンプを指定オフセットでフォーマット
///
/// # 引数
/// * `timestamp` - Unixタイムスタンプ（秒）
/// * `offset_seconds` - UTCからのオフセット（秒）。例: JST=32400
///
/// # 戻り値
/// - オフセット0: "2025-11-29 16:49:10 UTC"
/// - それ以外: "2025-11-30 01:49:10 +09:00"
///
/// 無効なタイムスタンプ・オフセットの場合は数値をそのまま文字列にして返す。
pub fn format_timestamp(timestamp: i64, offset_seconds: i32) -> String {
    let Some(datetime_utc) = Utc.timestamp_opt(timestamp, 0).single() else {
        return timestamp.to_string();
    };

    if offset_seconds == 0 {
        return format_utc(datetime_utc);
    }

    match FixedOffset::east_opt(offset_seconds) {
        Some(offset) => datetime_utc
            .with_timezone(&offset)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string(),
        None => format_utc(datetime_utc),
    }
}

/// UTC形式でフォーマット
fn format_utc(datetime: DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// バイト数を MB 表記にする
pub fn format_size_mb(size_bytes: u64) -> String {
    format!("{:.2} MB", size_bytes as f64 / crate::config::BYTES_PER_MB as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_utc() {
        // 1764434950 = 2025-11-29 16:49:10 UTC
        assert_eq!(format_timestamp(1764434950, 0), "2025-11-29 16:49:10 UTC");
    }

    #[test]
    fn test_format_timestamp_jst() {
        // UTC 16:49:10 → JST 01:49:10 (+9時間、翌日)
        assert_eq!(
            format_timestamp(1764434950, 32400),
            "2025-11-30 01:49:10 +09:00"
        );
    }

    #[test]
    fn test_format_timestamp_negative_offset() {
        assert_eq!(
            format_timestamp(1764434950, -28800),
            "2025-11-29 08:49:10 -08:00"
        );
    }

    #[test]
    fn test_format_timestamp_invalid_offset_falls_back_to_utc() {
        assert!(format_timestamp(1764434950, 999_999).ends_with("UTC"));
    }

    #[test]
    fn test_format_size_mb() {
        assert_eq!(format_size_mb(10_485_760), "10.00 MB");
    }
}
