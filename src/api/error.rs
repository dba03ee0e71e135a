use std::io;
/// インフラ層のエラー定義
///
/// Gfycat API・ファイルシステムとのやり取りで発生するエラーを構造化して定義。
/// ステータスコードからの分類（401 / 想定外コード / 壊れたボディ）はここで一元化する。
use crate::error_severity::ErrorSeverity;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfraError {
    /// 認証失敗（トークン発行・APIいずれかで HTTP 401）
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// 想定外のステータスコード
    #[error("API error: {endpoint} returned HTTP {status_code}")]
    Client {
        endpoint: String,
        status_code: u16,
        message: String,
    },

    /// 2xx だが期待するフィールドが無い、または error ペイロードを含む
    #[error("malformed response from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },

    /// ファイル送信またはエンコード処理の失敗
    #[error("upload failed: {message}")]
    Upload {
        message: String,
        status_code: Option<u16>,
    },

    /// 存在しない gfy
    #[error("gfy not found: {gfy_id}")]
    NotFound { gfy_id: String },

    /// ポーリング回数の上限に達した
    #[error("encoding of '{gfy_id}' did not complete after {attempts} status checks")]
    PollTimeout { gfy_id: String, attempts: u32 },

    /// 呼び出し側による中断
    #[error("operation cancelled: {operation}")]
    Cancelled { operation: String },

    /// ネットワークエラー
    #[error("network error: {message}")]
    Network { message: String },

    /// タイムアウトエラー
    #[error("operation timed out: {operation}")]
    Timeout { operation: String },

    /// ローカルファイルの読み込みエラー
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl InfraError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn client(endpoint: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
        Self::Client {
            endpoint: endpoint.into(),
            status_code,
            message: message.into(),
        }
    }

    pub fn malformed(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn upload(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::Upload {
            message: message.into(),
            status_code,
        }
    }

    pub fn not_found(gfy_id: impl Into<String>) -> Self {
        Self::NotFound {
            gfy_id: gfy_id.into(),
        }
    }

    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    /// ネットワークエラーを作成
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// 想定外レスポンスのステータスコード（あれば）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Client { status_code, .. } => Some(*status_code),
            Self::Upload { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// エラーの深刻度を返す
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Authentication { .. } => ErrorSeverity::ConfigError,
            Self::NotFound { .. } => ErrorSeverity::UserError,
            Self::Cancelled { .. } => ErrorSeverity::Interrupted,
            Self::Client { .. }
            | Self::MalformedResponse { .. }
            | Self::Upload { .. }
            | Self::PollTimeout { .. }
            | Self::Network { .. }
            | Self::Timeout { .. }
            | Self::Io { .. } => ErrorSeverity::SystemError,
        }
    }

    /// ユーザー向けのヒントメッセージを返す
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Authentication { .. } => Some(
                "Check your client id/secret, username and password, then run 'gfyeet login' again.",
            ),
            Self::NotFound { .. } => Some("Check the gfy id. Private gfys are only visible to their owner."),
            Self::PollTimeout { .. } => {
                Some("Encoding is still running on Gfycat. Try 'gfyeet show <gfy_id>' later.")
            }
            Self::Network { .. } | Self::Timeout { .. } => {
                Some("Check your network connection and try again.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(
            InfraError::authentication("bad credentials").severity(),
            ErrorSeverity::ConfigError
        );
        assert_eq!(
            InfraError::client("/v1/gfycats", 500, "boom").severity(),
            ErrorSeverity::SystemError
        );
        assert_eq!(InfraError::not_found("abc").severity(), ErrorSeverity::UserError);
        assert_eq!(
            InfraError::cancelled("poll").severity(),
            ErrorSeverity::Interrupted
        );
    }

    #[test]
    fn test_status_code() {
        assert_eq!(InfraError::client("/x", 503, "").status_code(), Some(503));
        assert_eq!(InfraError::upload("denied", Some(403)).status_code(), Some(403));
        assert_eq!(InfraError::network("reset").status_code(), None);
    }

    #[test]
    fn test_client_error_display_contains_code() {
        let err = InfraError::client("/v1/users/alice", 418, "teapot");
        assert_eq!(err.to_string(), "API error: /v1/users/alice returned HTTP 418");
    }
}
