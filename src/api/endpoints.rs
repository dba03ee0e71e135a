//! Gfycat API のエンドポイント定義
//!
//! パスは固定。ホスト部分（API / file drop / 公開ページ）は `Endpoints` が保持し、
//! テストではモックサーバーのURLに差し替える。
//! パスに埋め込む id / ユーザー名はパーセントエンコードする。

use crate::config::APP_CONFIG;

pub const TOKEN: &str = "/v1/oauth/token";
pub const GFYCATS: &str = "/v1/gfycats";
pub const EMAIL_VERIFIED: &str = "/v1/me/email_verified/";
pub const SEND_VERIFICATION_EMAIL: &str = "/v1/me/send_verification_email/";

/// メタデータ取得: GET /v1/gfycats/{id}
pub fn gfycat(gfy_id: &str) -> String {
    format!("{}/{}", GFYCATS, urlencoding::encode(gfy_id))
}

/// エンコード状態: GET /v1/gfycats/fetch/status/{id}
pub fn upload_status(gfy_id: &str) -> String {
    format!("{}/fetch/status/{}", GFYCATS, urlencoding::encode(gfy_id))
}

/// ユーザー名の存在確認: HEAD /v1/users/{username}
pub fn user(username: &str) -> String {
    format!("/v1/users/{}", urlencoding::encode(username))
}

/// 接続先ホストの組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api_base: String,
    filedrop_url: String,
    page_base: String,
}

impl Endpoints {
    pub fn new(api_base: impl Into<String>, filedrop_url: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            filedrop_url: filedrop_url.into(),
            page_base: APP_CONFIG.api.page_url.to_string(),
        }
    }

    /// 本番環境のエンドポイント
    pub fn production() -> Self {
        Self::new(APP_CONFIG.api.endpoint, APP_CONFIG.api.filedrop_endpoint)
    }

    /// APIパスから完全なURLを組み立てる
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    /// ファイル送信先（file drop ホストのルート）
    pub fn filedrop_url(&self) -> &str {
        &self.filedrop_url
    }

    /// gfy の公開ページURL
    pub fn page_url(&self, gfy_id: &str) -> String {
        format!(
            "{}/{}",
            self.page_base.trim_end_matches('/'),
            urlencoding::encode(gfy_id)
        )
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::production()
    }
}
