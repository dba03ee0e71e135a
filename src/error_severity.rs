//! エラー深刻度と終了コード
//!
//! api / domain / config の各層のエラーは最終的にこの分類へ畳み込まれ、
//! バイナリ側（main.rs）が終了コードを決定する際に使用する。
//! このモジュールは他のモジュールに依存しない。

use std::fmt;

/// エラーの深刻度と対応する終了コード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// ユーザーの入力エラー
    ///
    /// ファイルが見つからない、ユーザー名が不正など、ユーザーが直せるもの。
    ///
    /// **Exit Code: 1**
    UserError,

    /// 設定・認証エラー
    ///
    /// クライアントID/シークレットやパスワードの誤り、設定ファイルの破損など。
    ///
    /// **Exit Code: 2**
    ConfigError,

    /// システムエラー
    ///
    /// ネットワーク障害、Gfycat側の異常レスポンス、エンコード失敗など。
    ///
    /// **Exit Code: 3**
    SystemError,

    /// ユーザーによる中断（Ctrl-C でポーリングを打ち切った場合）
    ///
    /// **Exit Code: 130**
    Interrupted,
}

impl ErrorSeverity {
    /// 対応する Unix 終了コードを返す
    pub fn exit_code(self) -> i32 {
        match self {
            Self::UserError => 1,
            Self::ConfigError => 2,
            Self::SystemError => 3,
            Self::Interrupted => 130,
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserError => write!(f, "user error"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::SystemError => write!(f, "system error"),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}
