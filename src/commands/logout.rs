/// ログアウトコマンド
///
/// 保存されている認証情報を削除します。
use crate::commands::result::{CommandResult, LogoutResult};
use anyhow::{Context, Result};
use gfyeet::config::UserConfig;

pub async fn execute() -> Result<CommandResult> {
    let mut config = UserConfig::load().context("Failed to load configuration file")?;

    let was_logged_in = config.has_auth();
    if !was_logged_in {
        return Ok(CommandResult::Logout(LogoutResult {
            was_logged_in: false,
        }));
    }

    config.clear_auth();
    config.save().context("Failed to save configuration file")?;

    Ok(CommandResult::Logout(LogoutResult {
        was_logged_in: true,
    }))
}
