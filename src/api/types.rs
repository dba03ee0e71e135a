/// API通信用の型定義
///
/// Gfycat APIのリクエスト/レスポンスのワイヤ形式を定義します。
/// Gfycat は 200 でも `error` フィールドを返すことがあるため、
/// 各レスポンス型は `error` を任意項目として持ちます。
use crate::domain::metadata::GfyMetadata;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// パスワードグラントのリクエストボディ（POST /v1/oauth/token）
#[derive(Serialize)]
pub struct PasswordGrantRequest<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

/// トークン発行レスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default)]
    pub token_type: Option<String>,

    /// アクセストークンの有効期限（秒）
    #[serde(default)]
    pub expires_in: Option<u64>,

    #[serde(default)]
    pub error: Option<Value>,
}

/// アップロード枠確保レスポンス（POST /v1/gfycats）
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSlotResponse {
    #[serde(default)]
    pub gfyname: Option<String>,

    /// アップロード用の一時シークレット（file drop では未使用）
    #[serde(default)]
    pub secret: Option<String>,

    #[serde(default)]
    pub error: Option<Value>,
}

/// エンコード状態レスポンス（GET /v1/gfycats/fetch/status/{id}）
#[derive(Debug, Clone, Deserialize)]
pub struct UploadStatusResponse {
    /// "encoding" / "complete" / "NotFoundo" / "error" など
    #[serde(default)]
    pub task: Option<String>,

    /// 完了時の gfy 名。重複検出時は既存 gfy の名前になる
    #[serde(default)]
    pub gfyname: Option<String>,

    #[serde(default, rename = "errorMessage")]
    pub error_message: Option<Value>,
}

/// メタデータ取得レスポンス（GET /v1/gfycats/{id}）
#[derive(Debug, Clone, Deserialize)]
pub struct GfyItemResponse {
    #[serde(default, rename = "gfyItem")]
    pub gfy_item: Option<GfyMetadata>,

    #[serde(default)]
    pub error: Option<Value>,
}

/// ファイル送信レスポンス（空の場合もある）
#[derive(Debug, Clone, Deserialize)]
pub struct FileDropResponse {
    #[serde(default)]
    pub error: Option<Value>,
}

/// `error` / `errorMessage` の値を人間向けの文字列にする
///
/// 文字列のほか `{"code": ..., "description": ...}` 形式のオブジェクトもある。
pub fn describe_error(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("description")
            .or_else(|| map.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}
