/// 設定管理モジュール
///
/// このモジュールは2層の設定構造を提供します:
/// 1. AppConfig - コンパイル時定数として定義される静的設定（APP_CONFIG）
/// 2. UserConfig - 実行時に読み込まれる動的設定（認証情報・表示設定）
///
/// # 使用例
///
/// ```no_run
/// use gfyeet::config::{APP_CONFIG, UserConfig};
///
/// let endpoint = APP_CONFIG.api.endpoint;
/// let user_config = UserConfig::load().unwrap();
/// let auth = user_config.get_auth().unwrap();
/// ```
pub mod app;
pub mod error;
pub mod permissions;
pub mod user;

pub use app::{APP_CONFIG, BYTES_PER_MB};
pub use user::UserConfig;
