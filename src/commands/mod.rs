pub mod email;
pub mod help;
pub mod login;
pub mod logout;
pub mod result;
pub mod show;
pub mod status;
pub mod upload;
pub mod username;

pub use result::CommandResult;

use anyhow::{Context, Result};
use gfyeet::GfycatClient;
use gfyeet::config::UserConfig;

/// 保存済みの認証情報から本番向けクライアントを作成
///
/// 設定ファイルの読み込みに失敗した場合や、未ログインの場合はエラー。
pub(crate) fn client_from_config() -> Result<GfycatClient> {
    let user_config = UserConfig::load()
        .context("Failed to load user configuration. Please check your config.toml file.")?;

    let auth = user_config
        .get_auth()
        .context("Authentication credentials not found. Please run 'gfyeet login' first.")?;

    let client = GfycatClient::production(auth.to_credentials())
        .context("Failed to create API client")?;

    Ok(client)
}
