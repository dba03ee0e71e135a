/// アプリケーション設定モジュール
///
/// コンパイル時定数として埋め込まれる静的設定を管理します。
/// これらの設定は実行時には変更できません。

/// メガバイトあたりのバイト数
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// アプリケーション全体の設定
#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

/// API関連の設定
#[derive(Debug, Clone, Copy)]
pub struct ApiConfig {
    /// Gfycat API のベースURL
    pub endpoint: &'static str,

    /// 動画ファイルの送信先（file drop ホスト）
    pub filedrop_endpoint: &'static str,

    /// アップロード後に公開されるページのベースURL
    pub page_url: &'static str,

    /// APIリクエストのタイムアウト(秒)
    pub timeout_seconds: u64,
}

/// アップロード関連の設定
#[derive(Debug, Clone, Copy)]
pub struct UploadConfig {
    /// アップロード可能な最大ファイルサイズ (バイト)
    pub max_file_size: u64,

    /// 対応する動画フォーマット
    pub supported_formats: &'static [&'static str],

    /// エンコード状態のポーリング間隔(秒)
    pub poll_interval_seconds: u64,

    /// ポーリングの最大回数（interval × attempts が待機の上限になる）
    pub max_poll_attempts: u32,
}

/// ロギング関連の設定
#[derive(Debug, Clone, Copy)]
pub struct LoggingConfig {
    /// RUST_LOG もユーザー設定も無い場合に使うフィルタ
    pub default_level: &'static str,
}

/// グローバルなアプリケーション設定
pub const APP_CONFIG: AppConfig = AppConfig {
    api: ApiConfig {
        endpoint: "https://api.gfycat.com",
        filedrop_endpoint: "https://filedrop.gfycat.com/",
        page_url: "https://gfycat.com/",
        timeout_seconds: 300,
    },
    upload: UploadConfig {
        max_file_size: 1024 * BYTES_PER_MB,
        supported_formats: &["mp4", "mov", "webm", "avi", "mkv", "gif", "flv", "wmv"],
        poll_interval_seconds: 5,
        max_poll_attempts: 360,
    },
    logging: LoggingConfig {
        default_level: "warn",
    },
};
