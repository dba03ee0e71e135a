/// ステータスコマンド
///
/// 保存済みの認証情報でトークンが取得できるか（ログイン状態か）を確認します。
use crate::commands::result::{CommandResult, StatusResult};
use anyhow::{Context, Result};
use gfyeet::GfycatClient;
use gfyeet::api::auth::mask_secret;
use gfyeet::config::UserConfig;
use tracing::warn;

pub async fn execute() -> Result<CommandResult> {
    let config = UserConfig::load().context("Failed to load configuration file")?;

    let Some(auth) = config.auth.as_ref() else {
        return Ok(CommandResult::Status(StatusResult {
            is_authenticated: false,
            username: None,
        }));
    };

    let username = Some(mask_secret(&auth.username));
    let client = GfycatClient::production(auth.to_credentials())
        .context("Failed to create API client")?;

    // 認証失敗はエラーではなく「未認証」として報告する
    let is_authenticated = match client.test_credentials().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "stored credentials were rejected");
            false
        }
    };

    Ok(CommandResult::Status(StatusResult {
        is_authenticated,
        username,
    }))
}
