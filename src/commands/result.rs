/// コマンド実行結果を表す型
///
/// 各コマンドはこの型を返し、プレゼンテーション層（main.rs/cli.rs）で
/// 人間向けと機械向けの出力フォーマットを決定する。
use gfyeet::GfyMetadata;
use gfyeet::api::{UsernameStatus, VerificationEmail};
use serde::Serialize;

/// コマンド実行結果の統一型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandResult {
    Login(LoginResult),
    Logout(LogoutResult),
    Status(StatusResult),
    Upload(UploadResult),
    Show(ShowResult),
    Username(UsernameResult),
    EmailStatus(EmailStatusResult),
    SendVerification(SendVerificationResult),
    Help,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// 既にログイン済みだったか（上書き更新の場合true）
    pub was_logged_in: bool,
    /// マスキングされたユーザー名
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogoutResult {
    pub was_logged_in: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResult {
    /// トークンが取得できたか
    pub is_authenticated: bool,
    /// マスキングされたユーザー名（認証情報がある場合）
    pub username: Option<String>,
}

/// アップロードコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    /// 完成した gfy の id（重複検出時は既存の gfy）
    pub gfy_id: String,
    /// 公開ページURL
    pub page_url: String,
    pub file_path: String,
    pub file_size: u64,
    pub file_format: String,
    /// エンコード完了後に取得したメタデータ（取得できなかった場合None）
    pub metadata: Option<GfyMetadata>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowResult {
    pub page_url: String,
    pub gfy: GfyMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsernameResult {
    pub username: String,
    pub status: UsernameStatus,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailStatusResult {
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendVerificationResult {
    pub outcome: VerificationEmail,
}
